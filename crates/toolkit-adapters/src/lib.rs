//! Product adapters for the toolkit engine.
//!
//! An adapter knows one third-party product: where its API description
//! lives, how its paths name entities, and how it authenticates. Adapters
//! are looked up through an explicit [`AdapterRegistry`]; registered products
//! live in a [`ProductRegistry`].
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_adapters::{AdapterOptions, AdapterRegistry};
//! use toolkit_engine_core::{Credentials, ProductId};
//!
//! let registry = AdapterRegistry::with_defaults();
//! let adapter = registry
//!     .create(&ProductId::new("pipedrive"), AdapterOptions::default())
//!     .unwrap();
//!
//! let creds: Credentials = [("api_token", "abc")].into_iter().collect();
//! let auth = adapter.resolve_auth(&creds).unwrap();
//! assert!(auth.headers.is_empty());
//! assert_eq!(auth.query, vec![("api_token".to_string(), "abc".to_string())]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod adapter;
mod hubspot;
pub mod openapi;
mod pipedrive;
mod registry;

pub use adapter::{AdapterOptions, ProductAdapter};
pub use hubspot::HubSpotAdapter;
pub use pipedrive::PipedriveAdapter;
pub use registry::{AdapterFactory, AdapterRegistry, ProductRegistry};

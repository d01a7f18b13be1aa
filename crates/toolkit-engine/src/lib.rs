//! Toolkit engine: uniform clients for heterogeneous CRM APIs.
//!
//! The pipeline runs in four persisted stages:
//!
//! 1. **register**: store a [`ProductDefinition`](toolkit_engine_core::ProductDefinition)
//! 2. **discover**: fetch the product's API description and normalize its
//!    endpoints into capabilities
//! 3. **select**: score and group capabilities, resolve ambiguous
//!    `(entity, action)` pairs and save the mapping
//! 4. **generate**: build a [`GeneratedClient`] from the mapping
//!
//! # Examples
//!
//! ```no_run
//! use toolkit_engine::Engine;
//! use toolkit_engine_adapters::AdapterOptions;
//! use toolkit_engine_client::OperationArgs;
//! use toolkit_engine_core::{Credentials, EngineConfig, ProductId};
//!
//! # async fn example() -> toolkit_engine_core::Result<()> {
//! let engine = Engine::new(EngineConfig::load()?)?;
//! let id = ProductId::new("pipedrive");
//!
//! engine.discover(&id, AdapterOptions::default()).await?;
//! engine.select(&id, None)?;
//!
//! let creds: Credentials = [("api_token", "...")].into_iter().collect();
//! let client = engine.generate_client(&id, &creds)?;
//! let contacts = client.list("contacts", OperationArgs::new()).await?;
//! println!("{} contacts", contacts.len());
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod catalog;
mod engine;

pub use catalog::CapabilityCatalog;
pub use engine::Engine;
pub use toolkit_engine_client::GeneratedClient;

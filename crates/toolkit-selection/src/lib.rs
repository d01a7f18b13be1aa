//! Scoring, grouping and selection of discovered capabilities.
//!
//! The pipeline of this crate turns a flat list of normalized capabilities
//! into a [`Mapping`]:
//!
//! 1. [`scoring`] assigns each capability a usefulness score,
//! 2. [`grouping`] partitions capabilities by `(entity, action)` and flags
//!    groups with more than one candidate as ambiguous,
//! 3. [`selector`] picks exactly one capability per group, either
//!    automatically or through a [`Chooser`],
//! 4. the result is a [`Mapping`], persisted and fed to client generation.
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
//! use toolkit_engine_selection::{Selector, group, score_all};
//!
//! let product = ProductId::new("pipedrive");
//! let caps = vec![
//!     Capability::new(product.clone(), EntityName::new("contacts"), Action::List,
//!                     HttpMethod::Get, "/persons/collection"),
//!     Capability::new(product.clone(), EntityName::new("contacts"), Action::List,
//!                     HttpMethod::Get, "/persons"),
//! ];
//!
//! let groups = group(score_all(caps));
//! let mapping = Selector::new().resolve_auto(&product, groups).unwrap();
//! let entry = mapping.entry(&EntityName::new("contacts"), Action::List).unwrap();
//! assert_eq!(entry.path, "/persons");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod grouping;
pub mod mapping;
pub mod scoring;
pub mod selector;

pub use grouping::{CapabilityGroup, GroupKey, ambiguities, group};
pub use mapping::{Mapping, MappingEntry};
pub use scoring::{score, score_all};
pub use selector::{Chooser, RankedGroup, Selector, rank};

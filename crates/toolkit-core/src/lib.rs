//! Core types, configuration, and errors for the toolkit engine.
//!
//! This crate provides the foundational types shared by every other crate in
//! the workspace.
//!
//! # Architecture
//!
//! The core consists of:
//! - Strong domain types (`ProductId`, `EntityName`, `Action`, `HttpMethod`)
//! - The capability model and endpoint normalization
//! - Path template parsing shared by scoring and request building
//! - Product definitions, credentials and resolved authentication
//! - The error taxonomy used across the pipeline
//! - Engine configuration (home directory, timeouts, retry policy)

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

mod capability;
mod config;
mod credentials;
mod error;
mod path;
mod product;
mod types;

pub mod cli;

pub use capability::{Capability, RawEndpoint, derive_action, normalize_endpoints};
pub use config::{CONFIG_FILE, EngineConfig, HOME_ENV_VAR, RetryPolicy};
pub use credentials::{Credentials, ResolvedAuth};
pub use error::{Error, Result};
pub use path::{PathTemplate, Segment};
pub use product::{AuthMethod, ProductDefinition, ProductType};
pub use types::{Action, EntityName, HttpMethod, ProductId, entities};

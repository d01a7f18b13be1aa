//! Persistence layer for the toolkit engine.
//!
//! Every pipeline stage persists its output as a JSON record keyed by product
//! id and [`RecordKind`]:
//!
//! - `product`: the registered product definition
//! - `raw_spec`: the API description as fetched during discovery
//! - `capabilities`: normalized capabilities
//! - `mapping`: the resolved `(entity, action)` mapping
//!
//! Records are stored by [`JsonFileStore`] as `<home>/<product_id>_<kind>.json`.
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_core::ProductId;
//! use toolkit_engine_store::{JsonFileStore, RecordKind, RecordStore, RecordStoreExt};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let temp = tempfile::tempdir()?;
//! let store = JsonFileStore::new(temp.path())?;
//! let id = ProductId::new("hubspot");
//!
//! store.save_as(&id, RecordKind::Product, &serde_json::json!({"name": "HubSpot"}))?;
//! assert_eq!(store.list_products()?, vec![id]);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{JsonFileStore, RecordKind, RecordStore, RecordStoreExt};

//! Record store implementation.
//!
//! Provides the [`RecordStore`] trait and its file-backed implementation
//! [`JsonFileStore`].

use crate::error::{Result, StoreError};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use toolkit_engine_core::ProductId;

/// Kind of record persisted per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// The product definition
    Product,
    /// The raw API description as fetched
    RawSpec,
    /// Normalized capabilities
    Capabilities,
    /// The resolved mapping
    Mapping,
}

impl RecordKind {
    /// File-name suffix of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::RawSpec => "raw_spec",
            Self::Capabilities => "capabilities",
            Self::Mapping => "mapping",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value persistence of JSON records by `(product_id, kind)`.
///
/// Last write wins.
pub trait RecordStore: Send + Sync {
    /// Loads a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record was saved.
    fn load(&self, product_id: &ProductId, kind: RecordKind) -> Result<Value>;

    /// Saves a record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn save(&self, product_id: &ProductId, kind: RecordKind, record: &Value) -> Result<()>;

    /// Product ids that have a saved product record, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated.
    fn list_products(&self) -> Result<Vec<ProductId>>;
}

/// Typed access on top of any [`RecordStore`].
pub trait RecordStoreExt: RecordStore {
    /// Loads and deserializes a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] or [`StoreError::Serialization`].
    fn load_as<T: DeserializeOwned>(
        &self,
        product_id: &ProductId,
        kind: RecordKind,
    ) -> Result<T> {
        let value = self.load(product_id, kind)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Serializes and saves a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Serialization`] or an I/O error.
    fn save_as<T: Serialize>(
        &self,
        product_id: &ProductId,
        kind: RecordKind,
        record: &T,
    ) -> Result<()> {
        let value = serde_json::to_value(record)?;
        self.save(product_id, kind, &value)
    }
}

impl<S: RecordStore + ?Sized> RecordStoreExt for S {}

/// Store keeping one pretty-printed JSON file per record.
///
/// # Directory Structure
///
/// ```text
/// home/
/// ├── hubspot_product.json
/// ├── hubspot_raw_spec.json
/// ├── hubspot_capabilities.json
/// └── hubspot_mapping.json
/// ```
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a partial record.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use toolkit_engine_core::ProductId;
/// use toolkit_engine_store::{JsonFileStore, RecordKind, RecordStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let temp = tempfile::tempdir()?;
/// let store = JsonFileStore::new(temp.path())?;
/// let id = ProductId::new("pipedrive");
///
/// store.save(&id, RecordKind::Mapping, &json!({"contacts": {}}))?;
/// assert_eq!(store.load(&id, RecordKind::Mapping)?, json!({"contacts": {}}));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    base_dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store at `base_dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        if !base_dir.exists() {
            fs::create_dir_all(&base_dir)?;
            tracing::debug!("Created record store directory: {}", base_dir.display());
        }

        Ok(Self { base_dir })
    }

    /// Directory holding the record files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Path of the file for a record. Does not check that it exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidProductId`] for unsafe ids.
    pub fn record_path(&self, product_id: &ProductId, kind: RecordKind) -> Result<PathBuf> {
        validate_product_id(product_id.as_str())?;
        Ok(self
            .base_dir
            .join(format!("{}_{}.json", product_id.as_str(), kind.as_str())))
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self, product_id: &ProductId, kind: RecordKind) -> Result<Value> {
        let path = self.record_path(product_id, kind)?;
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    product_id: product_id.to_string(),
                    kind,
                });
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, product_id: &ProductId, kind: RecordKind, record: &Value) -> Result<()> {
        let path = self.record_path(product_id, kind)?;
        let content = serde_json::to_string_pretty(record)?;

        let mut tmp = NamedTempFile::new_in(&self.base_dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        tracing::debug!("Saved {} record for {} to {}", kind, product_id, path.display());
        Ok(())
    }

    fn list_products(&self) -> Result<Vec<ProductId>> {
        let suffix = format!("_{}.json", RecordKind::Product.as_str());
        let mut products = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if let Some(id) = name.strip_suffix(&suffix)
                && validate_product_id(id).is_ok()
            {
                products.push(ProductId::new(id));
            }
        }

        products.sort();
        Ok(products)
    }
}

/// Validates that a product id is safe to embed in a file name.
///
/// Rejects ids that:
/// - Are empty
/// - Are parent directory references (`.` or `..`)
/// - Contain path separators (`/` or `\`)
/// - Contain control characters
fn validate_product_id(product_id: &str) -> Result<()> {
    let reason = if product_id.is_empty() {
        "Product id cannot be empty"
    } else if product_id == "." || product_id == ".." {
        "Product id cannot be '.' or '..'"
    } else if product_id.contains('/') || product_id.contains('\\') {
        "Product id cannot contain path separators"
    } else if product_id.chars().any(char::is_control) {
        "Product id cannot contain control characters"
    } else {
        return Ok(());
    };

    Err(StoreError::InvalidProductId {
        product_id: product_id.to_string(),
        reason: reason.to_string(),
    })
}

//! Error types for record store operations.

use crate::RecordKind;
use toolkit_engine_core::Error;

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during record store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No record of this kind has been saved for the product.
    #[error("No {kind} record for product '{product_id}'")]
    NotFound {
        /// Product the record was requested for
        product_id: String,
        /// Requested record kind
        kind: RecordKind,
    },

    /// Product id is unusable as part of a file name.
    ///
    /// Ids containing path separators, `.`/`..`, or control characters are
    /// rejected so a record can never be written outside the store
    /// directory.
    #[error("Invalid product id: {product_id} ({reason})")]
    InvalidProductId {
        /// The rejected id
        product_id: String,
        /// Why it was rejected
        reason: String,
    },

    /// I/O error while reading or writing a record file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record contents are not valid JSON of the expected shape.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns `true` if the record does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound {
                product_id,
                kind: RecordKind::Product,
            } => Self::ProductNotFound {
                product: product_id,
            },
            StoreError::NotFound { product_id, kind } => Self::NotFound {
                resource: format!("{kind} record for '{product_id}'"),
            },
            StoreError::InvalidProductId { product_id, reason } => Self::Config {
                message: format!("invalid product id '{product_id}': {reason}"),
            },
            StoreError::Io(e) => Self::Storage {
                message: e.to_string(),
                source: Some(e),
            },
            StoreError::Serialization(e) => e.into(),
        }
    }
}

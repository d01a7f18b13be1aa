//! Error types for the toolkit engine.
//!
//! Every stage of the pipeline reports failures through [`Error`]. Variants
//! are grouped by the stage that raises them:
//!
//! - discovery: [`Error::Discovery`], [`Error::AdapterNotFound`]
//! - configuration: [`Error::Config`], [`Error::ProductNotFound`]
//! - selection: [`Error::Selection`], [`Error::InvalidSelection`]
//! - generated clients: [`Error::UnsupportedOperation`],
//!   [`Error::MissingParameter`], [`Error::Api`], [`Error::ClosedClient`]
//! - persistence: [`Error::NotFound`], [`Error::Storage`],
//!   [`Error::SerializationError`]
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_core::{Error, Result};
//!
//! fn require_token(token: Option<&str>) -> Result<&str> {
//!     token.ok_or_else(|| Error::Config {
//!         message: "credentials must include 'access_token'".to_string(),
//!     })
//! }
//!
//! let err = require_token(None).unwrap_err();
//! assert!(err.is_config_error());
//! ```

use thiserror::Error;

/// Main error type for the toolkit engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The product's API description could not be fetched or parsed.
    ///
    /// Fatal to the discovery step of that product only.
    #[error("Discovery failed for '{product}': {message}")]
    Discovery {
        /// Product whose discovery failed
        product: String,
        /// Description of the failure
        message: String,
        /// Underlying error cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    ///
    /// Raised for missing or invalid credentials, invalid base URLs and
    /// unreadable configuration files. Credential problems surface before
    /// any request is sent.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The selection step could not produce a complete mapping.
    #[error("Selection failed: {message}")]
    Selection {
        /// Description of the unresolved state
        message: String,
    },

    /// An interactive choice was not a valid candidate index.
    #[error("Invalid selection '{input}': expected a number between 0 and {max}")]
    InvalidSelection {
        /// The raw answer that was rejected
        input: String,
        /// Highest valid index
        max: usize,
    },

    /// The operation is not present in the client's mapping.
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation {
        /// Name of the requested operation (e.g. `delete_contact`)
        operation: String,
    },

    /// A required identifier or path parameter was not supplied.
    #[error("Missing parameter '{parameter}' for {operation}")]
    MissingParameter {
        /// Operation being built
        operation: String,
        /// Name of the missing parameter
        parameter: String,
    },

    /// The remote API failed after retries were exhausted.
    ///
    /// `status` is `None` when no HTTP response was ever received.
    #[error("API request failed{}: {body}", status_suffix(*.status))]
    Api {
        /// HTTP status code of the last response, if any
        status: Option<u16>,
        /// Response body (or transport error description)
        body: String,
    },

    /// The generated client was used after `close()`.
    #[error("Client has been closed")]
    ClosedClient,

    /// The product is not registered.
    #[error("Product not found: {product}")]
    ProductNotFound {
        /// Requested product id
        product: String,
    },

    /// No adapter is registered for the product.
    #[error("No adapter available for product '{product}' (supported: {supported})")]
    AdapterNotFound {
        /// Requested product id
        product: String,
        /// Comma-separated list of supported product ids
        supported: String,
    },

    /// A persisted record does not exist.
    #[error("Resource not found: {resource}")]
    NotFound {
        /// Identifier of the missing resource
        resource: String,
    },

    /// Persistence failed.
    #[error("Storage error: {message}")]
    Storage {
        /// Description of the failure
        message: String,
        /// Underlying I/O error
        #[source]
        source: Option<std::io::Error>,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl Error {
    /// Returns `true` if this is a discovery error.
    #[must_use]
    pub const fn is_discovery_error(&self) -> bool {
        matches!(self, Self::Discovery { .. })
    }

    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolkit_engine_core::Error;
    ///
    /// let err = Error::Config {
    ///     message: "missing api_token".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Returns `true` for both selection failures and invalid choices.
    #[must_use]
    pub const fn is_selection_error(&self) -> bool {
        matches!(self, Self::Selection { .. } | Self::InvalidSelection { .. })
    }

    /// Returns `true` if an interactive choice was rejected.
    #[must_use]
    pub const fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::InvalidSelection { .. })
    }

    /// Returns `true` if the operation is not mapped.
    #[must_use]
    pub const fn is_unsupported_operation(&self) -> bool {
        matches!(self, Self::UnsupportedOperation { .. })
    }

    /// Returns `true` if a required parameter was missing.
    #[must_use]
    pub const fn is_missing_parameter(&self) -> bool {
        matches!(self, Self::MissingParameter { .. })
    }

    /// Returns `true` if this is a remote API failure.
    #[must_use]
    pub const fn is_api_error(&self) -> bool {
        matches!(self, Self::Api { .. })
    }

    /// Returns `true` if the client was used after close.
    #[must_use]
    pub const fn is_closed_client(&self) -> bool {
        matches!(self, Self::ClosedClient)
    }

    /// Returns `true` for missing products, adapters and records.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolkit_engine_core::Error;
    ///
    /// let err = Error::NotFound {
    ///     resource: "hubspot/mapping".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ProductNotFound { .. } | Self::AdapterNotFound { .. }
        )
    }

    /// Returns the HTTP status carried by an [`Error::Api`], if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

fn status_suffix(status: Option<u16>) -> String {
    status.map(|s| format!(" with status {s}")).unwrap_or_default()
}

/// Result type alias for toolkit engine operations.
pub type Result<T> = std::result::Result<T, Error>;

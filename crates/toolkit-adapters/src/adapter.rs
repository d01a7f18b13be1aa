//! The product adapter interface.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use toolkit_engine_core::{Credentials, ProductId, RawEndpoint, ResolvedAuth, Result};

/// Options passed to adapter factories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Overrides the adapter's built-in API description URL
    pub spec_url: Option<String>,
    /// Overrides the adapter's discovery timeout
    pub timeout: Option<Duration>,
}

impl AdapterOptions {
    /// Options overriding the spec URL.
    #[must_use]
    pub fn with_spec_url(mut self, url: impl Into<String>) -> Self {
        self.spec_url = Some(url.into());
        self
    }

    /// Options overriding the discovery timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Integration adapter for one third-party product.
///
/// All implementations must be `Send + Sync` to work with Tokio's async
/// runtime.
#[async_trait]
pub trait ProductAdapter: Send + Sync + std::fmt::Debug {
    /// Product this adapter integrates.
    fn product_id(&self) -> &ProductId;

    /// Fetches the product's API description.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::Discovery`] if the description
    /// cannot be fetched or is not JSON.
    async fn discover_spec(&self) -> Result<Value>;

    /// Extracts raw endpoint descriptors from an API description.
    ///
    /// Endpoints whose entity or action cannot be recognized are skipped.
    fn extract_capabilities(&self, spec: &Value) -> Vec<RawEndpoint>;

    /// Builds the authentication headers for requests.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::Config`] if a required
    /// credential field is missing.
    fn build_auth_headers(&self, credentials: &Credentials) -> Result<BTreeMap<String, String>>;

    /// Builds authentication query parameters. None by default.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::Config`] if a required
    /// credential field is missing.
    fn auth_query_params(&self, _credentials: &Credentials) -> Result<Vec<(String, String)>> {
        Ok(Vec::new())
    }

    /// Validates credentials and combines headers and query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`toolkit_engine_core::Error::Config`] for missing fields.
    fn resolve_auth(&self, credentials: &Credentials) -> Result<ResolvedAuth> {
        Ok(ResolvedAuth {
            headers: self.build_auth_headers(credentials)?,
            query: self.auth_query_params(credentials)?,
        })
    }
}

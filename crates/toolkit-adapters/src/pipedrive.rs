//! Pipedrive CRM adapter.

use crate::adapter::{AdapterOptions, ProductAdapter};
use crate::openapi::{self, EntityKeywords};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use toolkit_engine_core::{Credentials, Error, HttpMethod, ProductId, RawEndpoint, Result};

/// Published OpenAPI description of the Pipedrive v1 API.
pub const SPEC_URL: &str = "https://developers.pipedrive.com/docs/api/v1/openapi.json";

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(15);

const KEYWORDS: EntityKeywords = &[
    ("persons", "contacts"),
    ("organizations", "organisations"),
    ("deals", "deals"),
    ("activities", "activities"),
    ("products", "products"),
];

// Pipedrive v1 has no PATCH endpoints.
const METHODS: &[HttpMethod] = &[
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Delete,
];

/// Adapter for Pipedrive, authenticating with an `api_token` query
/// parameter.
#[derive(Debug, Clone)]
pub struct PipedriveAdapter {
    product_id: ProductId,
    spec_url: String,
    client: reqwest::Client,
}

impl PipedriveAdapter {
    /// Product id the adapter is registered under.
    pub const PRODUCT_ID: &'static str = "pipedrive";

    /// Creates the adapter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Discovery`] if the HTTP client cannot be built.
    pub fn new(options: AdapterOptions) -> Result<Self> {
        let product_id = ProductId::new(Self::PRODUCT_ID);
        let client = openapi::discovery_client(
            &product_id,
            options.timeout.unwrap_or(DISCOVERY_TIMEOUT),
        )?;
        Ok(Self {
            product_id,
            spec_url: options.spec_url.unwrap_or_else(|| SPEC_URL.to_string()),
            client,
        })
    }

    /// URL the API description is fetched from.
    #[must_use]
    pub fn spec_url(&self) -> &str {
        &self.spec_url
    }

    fn api_token(credentials: &Credentials) -> Result<&str> {
        credentials.require("api_token").map_err(|_| Error::Config {
            message: "Pipedrive credentials must include 'api_token' field".to_string(),
        })
    }
}

#[async_trait]
impl ProductAdapter for PipedriveAdapter {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    async fn discover_spec(&self) -> Result<Value> {
        openapi::fetch_spec(&self.client, &self.product_id, &self.spec_url).await
    }

    fn extract_capabilities(&self, spec: &Value) -> Vec<RawEndpoint> {
        openapi::extract_endpoints(spec, KEYWORDS, METHODS)
    }

    /// The token travels as a query parameter, so no headers are added.
    fn build_auth_headers(&self, credentials: &Credentials) -> Result<BTreeMap<String, String>> {
        Self::api_token(credentials)?;
        Ok(BTreeMap::new())
    }

    fn auth_query_params(&self, credentials: &Credentials) -> Result<Vec<(String, String)>> {
        let token = Self::api_token(credentials)?;
        Ok(vec![("api_token".to_string(), token.to_string())])
    }
}

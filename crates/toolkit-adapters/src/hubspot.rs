//! HubSpot CRM adapter.

use crate::adapter::{AdapterOptions, ProductAdapter};
use crate::openapi::{self, EntityKeywords};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use toolkit_engine_core::{Credentials, Error, HttpMethod, ProductId, RawEndpoint, Result};

/// Public API catalog entry for the HubSpot CRM v3 APIs.
pub const SPEC_URL: &str = "https://api.hubspot.com/api-catalog-public/v1/apis/crm/v3";

const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(10);

const KEYWORDS: EntityKeywords = &[
    ("contacts", "contacts"),
    ("companies", "organisations"),
    ("deals", "deals"),
    ("tickets", "tickets"),
    ("products", "products"),
    ("line_items", "line_items"),
    ("lineitems", "line_items"),
    ("quotes", "quotes"),
];

const METHODS: &[HttpMethod] = &[
    HttpMethod::Get,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

/// Adapter for HubSpot, authenticating with a Bearer `access_token`.
///
/// # Examples
///
/// ```
/// use toolkit_engine_adapters::{AdapterOptions, HubSpotAdapter, ProductAdapter};
/// use toolkit_engine_core::Credentials;
///
/// let adapter = HubSpotAdapter::new(AdapterOptions::default()).unwrap();
/// let creds: Credentials = [("access_token", "tok")].into_iter().collect();
///
/// let headers = adapter.build_auth_headers(&creds).unwrap();
/// assert_eq!(headers["Authorization"], "Bearer tok");
///
/// let empty = Credentials::new();
/// assert!(adapter.build_auth_headers(&empty).unwrap_err().is_config_error());
/// ```
#[derive(Debug, Clone)]
pub struct HubSpotAdapter {
    product_id: ProductId,
    spec_url: String,
    client: reqwest::Client,
}

impl HubSpotAdapter {
    /// Product id the adapter is registered under.
    pub const PRODUCT_ID: &'static str = "hubspot";

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
}

#[async_trait]
impl ProductAdapter for HubSpotAdapter {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    async fn discover_spec(&self) -> Result<Value> {
        openapi::fetch_spec(&self.client, &self.product_id, &self.spec_url).await
    }

    fn extract_capabilities(&self, spec: &Value) -> Vec<RawEndpoint> {
        openapi::extract_endpoints(spec, KEYWORDS, METHODS)
    }

    fn build_auth_headers(&self, credentials: &Credentials) -> Result<BTreeMap<String, String>> {
        let token = credentials.require("access_token").map_err(|_| Error::Config {
            message: "HubSpot credentials must include 'access_token' field".to_string(),
        })?;

        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), format!("Bearer {token}"));
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use toolkit_engine_core::Action;

    fn adapter() -> HubSpotAdapter {
        HubSpotAdapter::new(AdapterOptions::default()).unwrap()
    }

    #[test]
    fn test_default_spec_url() {
        assert_eq!(adapter().spec_url(), SPEC_URL);
    }

    #[test]
    fn test_spec_url_override() {
        let adapter =
            HubSpotAdapter::new(AdapterOptions::default().with_spec_url("http://localhost/spec"))
                .unwrap();
        assert_eq!(adapter.spec_url(), "http://localhost/spec");
    }

    #[test]
    fn test_extracts_hubspot_paths() {
        let spec = json!({
            "paths": {
                "/crm/v3/objects/contacts": {"get": {}, "post": {}},
                "/crm/v3/objects/contacts/{contactId}": {"get": {}, "patch": {}, "delete": {}},
                "/crm/v3/objects/companies/{companyId}": {"get": {}},
                "/crm/v3/objects/line_items": {"get": {}},
                "/crm/v3/owners": {"get": {}}
            }
        });
        let endpoints = adapter().extract_capabilities(&spec);
        assert_eq!(endpoints.len(), 7);

        let update = endpoints
            .iter()
            .find(|e| e.http_method == "PATCH")
            .unwrap();
        assert_eq!(update.entity_name.as_str(), "contacts");
        assert_eq!(update.action, Some(Action::Update));

        assert!(
            endpoints
                .iter()
                .any(|e| e.entity_name.as_str() == "organisations" && e.action == Some(Action::Get))
        );
        assert!(endpoints.iter().any(|e| e.entity_name.as_str() == "line_items"));
    }

    #[test]
    fn test_blank_token_rejected() {
        let creds: Credentials = [("access_token", "  ")].into_iter().collect();
        let err = adapter().build_auth_headers(&creds).unwrap_err();
        assert!(err.to_string().contains("access_token"));
    }

    #[test]
    fn test_no_auth_query_params() {
        let creds: Credentials = [("access_token", "tok")].into_iter().collect();
        let auth = adapter().resolve_auth(&creds).unwrap();
        assert!(auth.query.is_empty());
        assert_eq!(auth.headers.len(), 1);
    }
}

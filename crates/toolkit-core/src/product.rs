//! Product definitions.
//!
//! A [`ProductDefinition`] records what is needed to talk to one third-party
//! API: its base URL and how it authenticates.

use crate::{Error, ProductId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

/// Kind of product being integrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Customer relationship management
    Crm,
    /// Accounting / invoicing
    Accounting,
}

impl ProductType {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Crm => "crm",
            Self::Accounting => "accounting",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "crm" => Ok(Self::Crm),
            "accounting" => Ok(Self::Accounting),
            _ => Err(Error::Config {
                message: format!("invalid product type '{s}' (expected: crm or accounting)"),
            }),
        }
    }
}

/// Authentication method of a product API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Static API key or token
    ApiKey,
    /// OAuth 2.0 access token
    Oauth2,
}

impl AuthMethod {
    /// Returns the snake_case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKey => "api_key",
            Self::Oauth2 => "oauth2",
        }
    }

    /// Credential field this method conventionally uses.
    #[must_use]
    pub const fn credential_field(&self) -> &'static str {
        match self {
            Self::ApiKey => "api_token",
            Self::Oauth2 => "access_token",
        }
    }

    /// Default auth metadata recorded at registration.
    #[must_use]
    pub fn default_metadata(&self) -> Map<String, Value> {
        let value = match self {
            Self::ApiKey => json!({
                "api_key_header": "Authorization",
                "api_key_prefix": "Bearer ",
            }),
            Self::Oauth2 => json!({
                "token_url": "",
                "scopes": [],
            }),
        };
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "api_key" => Ok(Self::ApiKey),
            "oauth2" => Ok(Self::Oauth2),
            _ => Err(Error::Config {
                message: format!("invalid auth method '{s}' (expected: api_key or oauth2)"),
            }),
        }
    }
}

/// Definition of a product to be integrated.
///
/// # Examples
///
/// ```
/// use toolkit_engine_core::{AuthMethod, ProductDefinition, ProductType};
///
/// let product = ProductDefinition::new(
///     "pipedrive",
///     "Pipedrive",
///     ProductType::Crm,
///     "https://api.pipedrive.com/v1",
///     AuthMethod::ApiKey,
/// );
/// assert_eq!(product.auth_metadata["api_key_header"], "Authorization");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDefinition {
    /// Internal product key
    pub product_id: ProductId,
    /// Human-readable name
    pub name: String,
    /// Product category
    #[serde(rename = "type")]
    pub product_type: ProductType,
    /// Base URL every endpoint path is joined to
    pub api_base_url: String,
    /// How requests authenticate
    pub auth_method: AuthMethod,
    /// Free-form authentication details
    #[serde(default)]
    pub auth_metadata: Map<String, Value>,
    /// When the product was registered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_at: Option<DateTime<Utc>>,
}

impl ProductDefinition {
    /// Creates a definition with the default metadata for `auth_method`.
    #[must_use]
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        product_type: ProductType,
        api_base_url: impl Into<String>,
        auth_method: AuthMethod,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            product_type,
            api_base_url: api_base_url.into(),
            auth_method,
            auth_metadata: auth_method.default_metadata(),
            registered_at: None,
        }
    }

    /// Replaces the auth metadata.
    #[must_use]
    pub fn with_auth_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.auth_metadata = metadata;
        self
    }

    /// Stamps the registration time.
    #[must_use]
    pub fn registered_now(mut self) -> Self {
        self.registered_at = Some(Utc::now());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_type_parse() {
        assert_eq!("CRM".parse::<ProductType>().unwrap(), ProductType::Crm);
        assert_eq!(
            "accounting".parse::<ProductType>().unwrap(),
            ProductType::Accounting
        );
        assert!("erp".parse::<ProductType>().unwrap_err().is_config_error());
    }

    #[test]
    fn test_auth_method_parse_and_fields() {
        assert_eq!("api_key".parse::<AuthMethod>().unwrap(), AuthMethod::ApiKey);
        assert_eq!(AuthMethod::Oauth2.credential_field(), "access_token");
        assert_eq!(AuthMethod::ApiKey.credential_field(), "api_token");
        assert!("basic".parse::<AuthMethod>().is_err());
    }

    #[test]
    fn test_default_metadata_oauth2() {
        let meta = AuthMethod::Oauth2.default_metadata();
        assert_eq!(meta["token_url"], "");
        assert!(meta["scopes"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_definition_serializes_original_field_names() {
        let product = ProductDefinition::new(
            "hubspot",
            "HubSpot",
            ProductType::Crm,
            "https://api.hubapi.com",
            AuthMethod::Oauth2,
        );
        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["product_id"], "hubspot");
        assert_eq!(json["type"], "crm");
        assert_eq!(json["auth_method"], "oauth2");
        assert!(json.get("registered_at").is_none());

        let back: ProductDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, product);
    }

    #[test]
    fn test_definition_accepts_missing_metadata() {
        let json = serde_json::json!({
            "product_id": "xero",
            "name": "Xero",
            "type": "accounting",
            "api_base_url": "https://api.xero.com",
            "auth_method": "oauth2"
        });
        let product: ProductDefinition = serde_json::from_value(json).unwrap();
        assert!(product.auth_metadata.is_empty());
        assert_eq!(product.product_type, ProductType::Accounting);
    }

    #[test]
    fn test_registered_now_sets_timestamp() {
        let product = ProductDefinition::new(
            "x",
            "X",
            ProductType::Crm,
            "https://x",
            AuthMethod::ApiKey,
        )
        .registered_now();
        assert!(product.registered_at.is_some());
    }
}

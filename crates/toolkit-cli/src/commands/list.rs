//! List command.

use super::emit;
use anyhow::Result;
use serde::Serialize;
use toolkit_engine::Engine;
use toolkit_engine_core::cli::{ExitCode, OutputFormat};

/// One registered product.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductSummary {
    /// Product id
    pub product_id: String,
    /// Human-readable name
    pub name: String,
    /// Product category
    #[serde(rename = "type")]
    pub product_type: String,
    /// Authentication method
    pub auth_method: String,
    /// API base URL
    pub api_base_url: String,
}

/// Registered products.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductList {
    /// Products sorted by id
    pub products: Vec<ProductSummary>,
    /// Number of products
    pub total: usize,
}

/// Collects the persisted products.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list(engine: &Engine) -> Result<ProductList> {
    let products: Vec<ProductSummary> = engine
        .list_products()?
        .into_iter()
        .map(|p| ProductSummary {
            product_id: p.product_id.into_inner(),
            name: p.name,
            product_type: p.product_type.to_string(),
            auth_method: p.auth_method.to_string(),
            api_base_url: p.api_base_url,
        })
        .collect();
    Ok(ProductList {
        total: products.len(),
        products,
    })
}

/// Runs `list`.
///
/// # Errors
///
/// See [`list`].
pub fn run(engine: &Engine, output_format: OutputFormat) -> Result<ExitCode> {
    emit(&list(engine)?, output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolkit_engine_core::{AuthMethod, EngineConfig, ProductDefinition, ProductType};

    #[test]
    fn test_list_empty_home() {
        let temp = tempfile::tempdir().unwrap();
        let engine = Engine::new(EngineConfig::from_home(temp.path()).unwrap()).unwrap();
        let listing = list(&engine).unwrap();
        assert_eq!(listing.total, 0);
    }

    #[test]
    fn test_list_summaries() {
        let temp = tempfile::tempdir().unwrap();
        let mut engine = Engine::new(EngineConfig::from_home(temp.path()).unwrap()).unwrap();
        engine
            .register_product(ProductDefinition::new(
                "hubspot",
                "HubSpot",
                ProductType::Crm,
                "https://api.hubapi.com",
                AuthMethod::Oauth2,
            ))
            .unwrap();

        let listing = list(&engine).unwrap();
        assert_eq!(
            listing.products,
            vec![ProductSummary {
                product_id: "hubspot".to_string(),
                name: "HubSpot".to_string(),
                product_type: "crm".to_string(),
                auth_method: "oauth2".to_string(),
                api_base_url: "https://api.hubapi.com".to_string(),
            }]
        );
    }
}

//! Register command.

use super::emit;
use anyhow::{Context, Result};
use toolkit_engine::Engine;
use toolkit_engine_core::cli::{ExitCode, OutputFormat};
use toolkit_engine_core::{AuthMethod, ProductDefinition, ProductType};

/// Arguments of `register`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterArgs {
    /// Product id
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// `crm` or `accounting`
    pub product_type: String,
    /// API base URL
    pub base_url: String,
    /// `api_key` or `oauth2`
    pub auth: String,
}

/// Validates the arguments and registers the product.
///
/// # Errors
///
/// Returns an error for an unknown type or auth method, or if the
/// definition cannot be persisted.
pub fn register(engine: &mut Engine, args: &RegisterArgs) -> Result<ProductDefinition> {
    let product_type: ProductType = args
        .product_type
        .parse()
        .context("invalid --type")?;
    let auth_method: AuthMethod = args.auth.parse().context("invalid --auth")?;

    let product = engine.register_product(ProductDefinition::new(
        args.id.as_str(),
        args.name.as_str(),
        product_type,
        args.base_url.as_str(),
        auth_method,
    ))?;
    tracing::info!("Registered product {}", product.product_id);
    Ok(product)
}

/// Runs `register` and prints the stored definition.
///
/// # Errors
///
/// See [`register`].
pub fn run(engine: &mut Engine, args: &RegisterArgs, output_format: OutputFormat) -> Result<ExitCode> {
    let product = register(engine, args)?;
    emit(&product, output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{exit_code_for, open_engine};

    fn args() -> RegisterArgs {
        RegisterArgs {
            id: "pipedrive".to_string(),
            name: "Pipedrive".to_string(),
            product_type: "crm".to_string(),
            base_url: "https://api.pipedrive.com/v1".to_string(),
            auth: "api_key".to_string(),
        }
    }

    #[test]
    fn test_register_persists() {
        let temp = tempfile::tempdir().unwrap();
        let mut engine = open_engine(Some(temp.path().to_path_buf())).unwrap();

        let product = register(&mut engine, &args()).unwrap();
        assert_eq!(product.auth_method, AuthMethod::ApiKey);
        assert!(product.registered_at.is_some());
        assert!(temp.path().join("pipedrive_product.json").exists());
    }

    #[test]
    fn test_register_rejects_unknown_type() {
        let temp = tempfile::tempdir().unwrap();
        let mut engine = open_engine(Some(temp.path().to_path_buf())).unwrap();

        let err = register(
            &mut engine,
            &RegisterArgs {
                product_type: "erp".to_string(),
                ..args()
            },
        )
        .unwrap_err();
        assert_eq!(exit_code_for(&err), ExitCode::INVALID_INPUT);
    }
}

//! Demo command: list a few contacts through the generated client.

use super::emit;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;
use toolkit_engine::Engine;
use toolkit_engine_client::OperationArgs;
use toolkit_engine_core::cli::{ExitCode, OutputFormat};
use toolkit_engine_core::{Credentials, Error, ProductId};

const SAMPLE_SIZE: usize = 3;

/// Environment variables consulted for a token, in order.
#[must_use]
pub fn token_env_vars(product_id: &ProductId) -> [String; 2] {
    let prefix: String = product_id
        .as_str()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    [format!("{prefix}_API_TOKEN"), format!("{prefix}_ACCESS_TOKEN")]
}

/// Picks the token from the flag, falling back to the environment.
///
/// # Errors
///
/// Returns [`Error::Config`] if no token is available.
pub fn resolve_token(
    product_id: &ProductId,
    flag: Option<String>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, Error> {
    if let Some(token) = flag.filter(|t| !t.trim().is_empty()) {
        return Ok(token);
    }
    let vars = token_env_vars(product_id);
    vars.iter()
        .find_map(|var| lookup(var).filter(|t| !t.trim().is_empty()))
        .ok_or_else(|| Error::Config {
            message: format!(
                "no token for {product_id}: pass --token or set {} or {}",
                vars[0], vars[1]
            ),
        })
}

/// Condensed view of a contact record.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ContactPreview {
    /// Record identifier
    pub id: Value,
    /// Display name, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Primary email, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ContactPreview {
    /// Extracts id, name and email from a flat or `properties`-nested record.
    #[must_use]
    pub fn from_record(record: &Value) -> Self {
        let properties = record.get("properties");
        let field = |key: &str| {
            record
                .get(key)
                .or_else(|| properties.and_then(|p| p.get(key)))
        };

        let name = field("name").and_then(Value::as_str).map_or_else(
            || {
                let parts: Vec<&str> = ["firstname", "lastname"]
                    .into_iter()
                    .filter_map(|k| field(k).and_then(Value::as_str))
                    .filter(|s| !s.is_empty())
                    .collect();
                (!parts.is_empty()).then(|| parts.join(" "))
            },
            |name| Some(name.to_string()),
        );

        let email = field("email").and_then(|email| match email {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => items
                .iter()
                .find(|item| item.get("primary").and_then(Value::as_bool) == Some(true))
                .or_else(|| items.first())
                .and_then(|item| item.get("value"))
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        });

        Self {
            id: record.get("id").cloned().unwrap_or(Value::Null),
            name,
            email,
        }
    }
}

/// Result of the demo.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DemoReport {
    /// Product id
    pub product_id: String,
    /// Operations offered by the generated client
    pub operations: Vec<String>,
    /// Contacts returned by `list_contacts`
    pub contacts_total: usize,
    /// First few contacts
    pub sample: Vec<ContactPreview>,
}

/// Generates a client with `token` and lists contacts.
///
/// The token is stored under the credential field of the product's auth
/// method.
///
/// # Errors
///
/// Returns an error if the product is unknown, selection has not run, or
/// the request fails.
pub async fn demo(engine: &Engine, product_id: &ProductId, token: String) -> Result<DemoReport> {
    let product = engine.product(product_id)?;
    let credentials: Credentials = [(product.auth_method.credential_field(), token)]
        .into_iter()
        .collect();

    let mut client = engine.generate_client(product_id, &credentials)?;
    let operations: Vec<String> = client.operations().map(str::to_string).collect();
    tracing::info!("Generated client for {} with {} operations", product_id, operations.len());

    let contacts = client.list("contacts", OperationArgs::new()).await;
    client.close();
    let contacts = contacts?;

    Ok(DemoReport {
        product_id: product_id.to_string(),
        operations,
        contacts_total: contacts.len(),
        sample: contacts
            .iter()
            .take(SAMPLE_SIZE)
            .map(ContactPreview::from_record)
            .collect(),
    })
}

/// Runs `demo`, reading the token from the flag or the environment.
///
/// # Errors
///
/// See [`resolve_token`] and [`demo`].
pub async fn run(
    engine: &Engine,
    product_id: &ProductId,
    token: Option<String>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let token = resolve_token(product_id, token, |var| std::env::var(var).ok())?;
    let report = demo(engine, product_id, token).await?;
    emit(&report, output_format)
}

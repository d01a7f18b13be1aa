//! Call command.
//!
//! Builds a client from the saved mapping and runs a single operation,
//! e.g. `call --id pipedrive --op get_contact --record-id 42`.

use super::emit;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Value, json};
use toolkit_engine::Engine;
use toolkit_engine_client::{OperationArgs, OperationOutput};
use toolkit_engine_core::cli::{ExitCode, OutputFormat};
use toolkit_engine_core::{Credentials, ProductId};

/// Arguments of `call`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallArgs {
    /// Operation name, e.g. `list_contacts`
    pub operation: String,
    /// `key=value` credential fields
    pub credentials: Vec<String>,
    /// Record identifier
    pub record_id: Option<String>,
    /// `name=value` path placeholder values
    pub path_params: Vec<String>,
    /// JSON request body
    pub data: Option<String>,
    /// `key=value` query parameters
    pub query: Vec<String>,
}

impl CallArgs {
    /// Parses the credential pairs.
    ///
    /// # Errors
    ///
    /// Returns an error for a pair without `=`.
    pub fn credentials(&self) -> Result<Credentials> {
        let mut credentials = Credentials::new();
        for pair in &self.credentials {
            let (key, value) = Credentials::parse_pair(pair)?;
            credentials.insert(key, value);
        }
        Ok(credentials)
    }

    /// Builds the operation arguments.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed pairs or a body that is not JSON.
    pub fn operation_args(&self) -> Result<OperationArgs> {
        let mut args = OperationArgs::new();
        if let Some(id) = &self.record_id {
            args = args.with_id(id.as_str());
        }
        for pair in &self.path_params {
            let (name, value) = Credentials::parse_pair(pair)
                .with_context(|| format!("invalid --path-param '{pair}'"))?;
            args = args.with_path_param(name, value);
        }
        for pair in &self.query {
            let (key, value) = Credentials::parse_pair(pair)
                .with_context(|| format!("invalid --query '{pair}'"))?;
            args = args.with_query(key, value);
        }
        if let Some(data) = &self.data {
            let body: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
            args = args.with_body(body);
        }
        Ok(args)
    }
}

/// Result of one call.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CallReport {
    /// Product id
    pub product_id: String,
    /// Operation name
    pub operation: String,
    /// Records, a single record, or `{"deleted": true}`
    pub result: Value,
}

fn output_value(output: OperationOutput) -> Value {
    match output {
        OperationOutput::Records(records) => Value::Array(records),
        OperationOutput::Record(record) => record,
        OperationOutput::Deleted => json!({ "deleted": true }),
    }
}

/// Runs one operation on a freshly generated client.
///
/// # Errors
///
/// Returns an error for invalid arguments or credentials, a missing
/// mapping, an unknown operation, or a failed request.
pub async fn call(engine: &Engine, product_id: &ProductId, args: &CallArgs) -> Result<CallReport> {
    let credentials = args.credentials()?;
    let operation_args = args.operation_args()?;

    let mut client = engine.generate_client(product_id, &credentials)?;
    let output = client.call(&args.operation, operation_args).await;
    client.close();

    Ok(CallReport {
        product_id: product_id.to_string(),
        operation: args.operation.clone(),
        result: output_value(output?),
    })
}

/// Runs `call` and prints its result.
///
/// # Errors
///
/// See [`call`].
pub async fn run(
    engine: &Engine,
    product_id: &ProductId,
    args: &CallArgs,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let report = call(engine, product_id, args).await?;
    emit(&report, output_format)
}

//! Select command.

use super::emit;
use crate::prompt::TerminalChooser;
use anyhow::Result;
use serde::Serialize;
use toolkit_engine::Engine;
use toolkit_engine_client::operation_name;
use toolkit_engine_core::ProductId;
use toolkit_engine_core::cli::{ExitCode, OutputFormat};
use toolkit_engine_selection::{Chooser, Mapping, ambiguities};

/// One resolved operation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MappedOperation {
    /// Operation name on the generated client
    pub operation: String,
    /// HTTP method
    pub http_method: String,
    /// Path template
    pub path: String,
    /// Score of the chosen endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Result of a selection run.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SelectionReport {
    /// Product id
    pub product_id: String,
    /// Number of `(entity, action)` groups
    pub groups: usize,
    /// Groups that had more than one candidate
    pub ambiguous: usize,
    /// Resolved operations sorted by entity then action
    pub operations: Vec<MappedOperation>,
}

impl SelectionReport {
    fn new(mapping: &Mapping, ambiguous: usize) -> Self {
        let operations: Vec<MappedOperation> = mapping
            .entries()
            .map(|(key, entry)| MappedOperation {
                operation: operation_name(&key.entity, key.action),
                http_method: entry.http_method.to_string(),
                path: entry.path.clone(),
                score: entry.score,
            })
            .collect();

        Self {
            product_id: mapping.product_id.to_string(),
            groups: operations.len(),
            ambiguous,
            operations,
        }
    }
}

/// Resolves and saves the mapping for `product_id`.
///
/// Without a chooser, ambiguous groups take their best-scored endpoint.
///
/// # Errors
///
/// Returns an error if discovery has not run or a group cannot be resolved.
pub fn select(
    engine: &Engine,
    product_id: &ProductId,
    chooser: Option<&mut dyn Chooser>,
) -> Result<SelectionReport> {
    let groups = engine.selection_groups(product_id)?;
    let ambiguous = ambiguities(&groups).len();
    let mapping = engine.resolve(product_id, groups, chooser)?;
    Ok(SelectionReport::new(&mapping, ambiguous))
}

/// Runs `select`, prompting on the terminal unless `auto` is set.
///
/// # Errors
///
/// See [`select`].
pub fn run(
    engine: &Engine,
    product_id: &ProductId,
    auto: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut terminal = TerminalChooser::new();
    let chooser = if auto {
        None
    } else {
        Some(&mut terminal as &mut dyn Chooser)
    };
    let report = select(engine, product_id, chooser)?;
    emit(&report, output_format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolkit_engine_core::{Action, EntityName, HttpMethod};
    use toolkit_engine_selection::{GroupKey, MappingEntry};

    #[test]
    fn test_report_names_operations() {
        let mut mapping = Mapping::new(ProductId::new("pipedrive"));
        mapping
            .insert(
                GroupKey::new(EntityName::new("contacts"), Action::Get),
                MappingEntry {
                    http_method: HttpMethod::Get,
                    path: "/persons/{id}".to_string(),
                    score: Some(0.9),
                },
            )
            .unwrap();

        let report = SelectionReport::new(&mapping, 0);
        assert_eq!(report.groups, 1);
        assert_eq!(report.operations[0].operation, "get_contact");
        assert_eq!(report.operations[0].http_method, "GET");
    }
}

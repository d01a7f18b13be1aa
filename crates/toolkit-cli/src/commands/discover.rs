//! Discover command.

use super::emit;
use anyhow::Result;
use serde::Serialize;
use toolkit_engine::{CapabilityCatalog, Engine};
use toolkit_engine_adapters::AdapterOptions;
use toolkit_engine_core::ProductId;
use toolkit_engine_core::cli::{ExitCode, OutputFormat};

/// Capabilities found for one entity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntitySummary {
    /// Normalized entity name
    pub entity: String,
    /// Number of capabilities
    pub capabilities: usize,
    /// `action: METHOD path` per capability, in discovery order
    pub endpoints: Vec<String>,
}

/// Result of a discovery run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DiscoverySummary {
    /// Product id
    pub product_id: String,
    /// Number of capabilities
    pub total_capabilities: usize,
    /// Per-entity breakdown, entities sorted
    pub entities: Vec<EntitySummary>,
}

impl From<&CapabilityCatalog> for DiscoverySummary {
    fn from(catalog: &CapabilityCatalog) -> Self {
        let entities = catalog
            .by_entity()
            .into_iter()
            .map(|(entity, capabilities)| EntitySummary {
                entity: entity.to_string(),
                capabilities: capabilities.len(),
                endpoints: capabilities
                    .iter()
                    .map(|c| format!("{}: {} {}", c.action, c.http_method, c.path))
                    .collect(),
            })
            .collect();

        Self {
            product_id: catalog.product_id.to_string(),
            total_capabilities: catalog.total_capabilities,
            entities,
        }
    }
}

/// Runs discovery for `product_id`, optionally against another spec URL.
///
/// # Errors
///
/// Returns an error if the product is unknown, has no adapter, or its API
/// description cannot be fetched.
pub async fn discover(
    engine: &Engine,
    product_id: &ProductId,
    spec_url: Option<String>,
) -> Result<DiscoverySummary> {
    let options = spec_url.map_or_else(AdapterOptions::default, |url| {
        AdapterOptions::default().with_spec_url(url)
    });
    let catalog = engine.discover(product_id, options).await?;
    if catalog.is_empty() {
        tracing::warn!("No capabilities recognized for {}", product_id);
    }
    Ok(DiscoverySummary::from(&catalog))
}

/// Runs `discover` and prints the per-entity summary.
///
/// # Errors
///
/// See [`discover`].
pub async fn run(
    engine: &Engine,
    product_id: &ProductId,
    spec_url: Option<String>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let summary = discover(engine, product_id, spec_url).await?;
    emit(&summary, output_format)
}

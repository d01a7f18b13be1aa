//! Persisted discovery results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use toolkit_engine_core::{Capability, EntityName, ProductId};

/// Capabilities discovered for one product, as persisted under the
/// `capabilities` record kind.
///
/// # Examples
///
/// ```
/// use toolkit_engine::CapabilityCatalog;
/// use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
///
/// let id = ProductId::new("pipedrive");
/// let catalog = CapabilityCatalog::new(
///     id.clone(),
///     vec![Capability::new(
///         id,
///         EntityName::new("contacts"),
///         Action::List,
///         HttpMethod::Get,
///         "/persons",
///     )],
/// );
/// assert_eq!(catalog.total_capabilities, 1);
/// assert_eq!(catalog.by_entity().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityCatalog {
    /// Product the capabilities belong to
    pub product_id: ProductId,
    /// Number of capabilities
    pub total_capabilities: usize,
    /// Capabilities in discovery order
    pub capabilities: Vec<Capability>,
}

impl CapabilityCatalog {
    /// Creates a catalog.
    #[must_use]
    pub fn new(product_id: ProductId, capabilities: Vec<Capability>) -> Self {
        Self {
            product_id,
            total_capabilities: capabilities.len(),
            capabilities,
        }
    }

    /// Capabilities grouped by entity, entities sorted.
    #[must_use]
    pub fn by_entity(&self) -> BTreeMap<&EntityName, Vec<&Capability>> {
        let mut entities: BTreeMap<&EntityName, Vec<&Capability>> = BTreeMap::new();
        for capability in &self.capabilities {
            entities
                .entry(&capability.entity_name)
                .or_default()
                .push(capability);
        }
        entities
    }

    /// Returns `true` if nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

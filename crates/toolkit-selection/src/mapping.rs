//! The resolved `(entity, action) → endpoint` mapping.
//!
//! A [`Mapping`] holds exactly one [`MappingEntry`] per group key. It is
//! built by the selector and read-only afterwards. Its `entities` field is
//! the nested table
//!
//! ```json
//! { "contacts": { "list": { "http_method": "GET", "path": "/persons", "score": 1.0 } } }
//! ```

use crate::grouping::GroupKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use toolkit_engine_core::{Action, Capability, EntityName, Error, HttpMethod, ProductId, Result};

/// The endpoint chosen for one `(entity, action)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// HTTP method
    pub http_method: HttpMethod,
    /// Path template
    pub path: String,
    /// Score of the chosen capability
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl From<&Capability> for MappingEntry {
    fn from(capability: &Capability) -> Self {
        Self {
            http_method: capability.http_method,
            path: capability.path.clone(),
            score: capability.score,
        }
    }
}

/// Resolved mapping for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    /// Product the mapping belongs to
    pub product_id: ProductId,
    /// When the mapping was resolved
    pub created_at: DateTime<Utc>,
    entities: BTreeMap<EntityName, BTreeMap<Action, MappingEntry>>,
}

impl Mapping {
    /// Creates an empty mapping stamped with the current time.
    #[must_use]
    pub fn new(product_id: ProductId) -> Self {
        Self {
            product_id,
            created_at: Utc::now(),
            entities: BTreeMap::new(),
        }
    }

    /// Adds the entry for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] if `key` already has an entry.
    pub fn insert(&mut self, key: GroupKey, entry: MappingEntry) -> Result<()> {
        let actions = self.entities.entry(key.entity.clone()).or_default();
        if actions.contains_key(&key.action) {
            return Err(Error::Selection {
                message: format!("duplicate mapping entry for {key}"),
            });
        }
        actions.insert(key.action, entry);
        Ok(())
    }

    /// Looks up the entry for an `(entity, action)` pair.
    #[must_use]
    pub fn entry(&self, entity: &EntityName, action: Action) -> Option<&MappingEntry> {
        self.entities.get(entity).and_then(|a| a.get(&action))
    }

    /// Returns `true` if `key` has an entry.
    #[must_use]
    pub fn contains(&self, key: &GroupKey) -> bool {
        self.entry(&key.entity, key.action).is_some()
    }

    /// All entries ordered by entity, then action.
    pub fn entries(&self) -> impl Iterator<Item = (GroupKey, &MappingEntry)> {
        self.entities.iter().flat_map(|(entity, actions)| {
            actions
                .iter()
                .map(move |(action, entry)| (GroupKey::new(entity.clone(), *action), entry))
        })
    }

    /// Mapped entity names in order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityName> {
        self.entities.keys()
    }

    /// Actions mapped for `entity`, in presentation order.
    #[must_use]
    pub fn actions(&self, entity: &EntityName) -> Vec<Action> {
        self.entities
            .get(entity)
            .map(|a| a.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Renders the nested entity/action table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if a score is not finite.
    pub fn table(&self) -> Result<Value> {
        Ok(serde_json::to_value(&self.entities)?)
    }

    /// Builds a mapping from a bare nested table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationError`] if `table` does not have the
    /// entity/action/entry shape.
    pub fn from_table(product_id: ProductId, table: Value) -> Result<Self> {
        let entities = serde_json::from_value(table)?;
        Ok(Self {
            product_id,
            created_at: Utc::now(),
            entities,
        })
    }
}

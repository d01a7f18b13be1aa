//! Grouping and ambiguity detection.
//!
//! Capabilities are partitioned by `(entity, action)`. A group with more than
//! one member is ambiguous and needs the selector to pick one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use toolkit_engine_core::{Action, Capability, EntityName};

/// Identity of a capability group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    /// Entity name
    pub entity: EntityName,
    /// Action
    pub action: Action,
}

impl GroupKey {
    /// Creates a group key.
    #[must_use]
    pub const fn new(entity: EntityName, action: Action) -> Self {
        Self { entity, action }
    }

    /// Key of the group a capability belongs to.
    #[must_use]
    pub fn of(capability: &Capability) -> Self {
        Self::new(capability.entity_name.clone(), capability.action)
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.entity, self.action)
    }
}

/// Capabilities sharing one `(entity, action)` pair, in discovery order.
#[derive(Debug, Clone, PartialEq)]
pub struct CapabilityGroup {
    /// Shared key
    pub key: GroupKey,
    /// Members in discovery order
    pub members: Vec<Capability>,
}

impl CapabilityGroup {
    /// Returns `true` if the group has more than one candidate.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.members.len() > 1
    }

    /// Number of candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns `true` if the group has no candidates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partitions capabilities by `(entity, action)`.
///
/// Groups appear in the order their key was first seen; members keep their
/// input order. Every input capability lands in exactly one group.
///
/// # Examples
///
/// ```
/// use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
/// use toolkit_engine_selection::group;
///
/// let p = ProductId::new("p");
/// let contacts = EntityName::new("contacts");
/// let groups = group(vec![
///     Capability::new(p.clone(), contacts.clone(), Action::List, HttpMethod::Get, "/a"),
///     Capability::new(p.clone(), contacts.clone(), Action::Get, HttpMethod::Get, "/a/{id}"),
///     Capability::new(p.clone(), contacts.clone(), Action::List, HttpMethod::Get, "/b"),
/// ]);
///
/// assert_eq!(groups.len(), 2);
/// assert!(groups[0].is_ambiguous());
/// assert!(!groups[1].is_ambiguous());
/// ```
#[must_use]
pub fn group(capabilities: Vec<Capability>) -> Vec<CapabilityGroup> {
    let mut groups: Vec<CapabilityGroup> = Vec::new();
    let mut index: HashMap<GroupKey, usize> = HashMap::new();

    for capability in capabilities {
        let key = GroupKey::of(&capability);
        if let Some(&i) = index.get(&key) {
            groups[i].members.push(capability);
        } else {
            index.insert(key.clone(), groups.len());
            groups.push(CapabilityGroup {
                key,
                members: vec![capability],
            });
        }
    }

    tracing::debug!(
        "Grouped capabilities into {} groups ({} ambiguous)",
        groups.len(),
        groups.iter().filter(|g| g.is_ambiguous()).count()
    );
    groups
}

/// Returns the ambiguous subset of `groups`, in order.
#[must_use]
pub fn ambiguities(groups: &[CapabilityGroup]) -> Vec<&CapabilityGroup> {
    groups.iter().filter(|g| g.is_ambiguous()).collect()
}

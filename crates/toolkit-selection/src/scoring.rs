//! Capability scoring.
//!
//! A score in `[0.0, 1.0]` estimates how useful an endpoint is as the
//! canonical implementation of its `(entity, action)` pair. It is a weighted
//! sum of three components:
//!
//! | component | weight | value |
//! |-----------|--------|-------|
//! | entity    | [`ENTITY_WEIGHT`] | entity priority / [`MAX_ENTITY_PRIORITY`] |
//! | action    | [`ACTION_WEIGHT`] | action priority / [`MAX_ACTION_PRIORITY`] |
//! | shape     | [`SHAPE_WEIGHT`]  | `1 / L` for `L` literal segments, minus [`DEPRIORITIZED_PENALTY`] per de-prioritized term |
//!
//! Scoring is pure: the same capability always gets the same score.
//!
//! # Examples
//!
//! ```
//! use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
//! use toolkit_engine_selection::score;
//!
//! let cap = |path: &str| Capability::new(
//!     ProductId::new("pipedrive"),
//!     EntityName::new("contacts"),
//!     Action::List,
//!     HttpMethod::Get,
//!     path,
//! );
//!
//! assert!((score(&cap("/persons")) - 1.0).abs() < 1e-9);
//! assert!((score(&cap("/persons/collection")) - 0.8).abs() < 1e-9);
//! ```

use toolkit_engine_core::{Action, Capability, entities};

/// Weight of the entity component.
pub const ENTITY_WEIGHT: f64 = 0.3;
/// Weight of the action component.
pub const ACTION_WEIGHT: f64 = 0.3;
/// Weight of the path-shape component.
pub const SHAPE_WEIGHT: f64 = 0.4;

/// Highest entity priority.
pub const MAX_ENTITY_PRIORITY: u8 = 3;
/// Highest action priority.
pub const MAX_ACTION_PRIORITY: u8 = 4;

/// Path terms marking bulk or auxiliary endpoints.
pub const DEPRIORITIZED_TERMS: [&str; 5] = ["batch", "search", "merge", "archive", "gdpr"];
/// Shape penalty per de-prioritized term found in the path.
pub const DEPRIORITIZED_PENALTY: f64 = 0.5;

/// Priority of an entity name. Unknown entities get `0`.
#[must_use]
pub fn entity_priority(entity: &str) -> u8 {
    match entity {
        entities::CONTACTS => 3,
        entities::DEALS | entities::ORGANISATIONS => 2,
        entities::ACTIVITIES => 1,
        _ => 0,
    }
}

/// Priority of an action.
#[must_use]
pub const fn action_priority(action: Action) -> u8 {
    match action {
        Action::List | Action::Get => 4,
        Action::Create | Action::Update => 3,
        Action::Delete => 1,
    }
}

/// Path-shape component in `[0.0, 1.0]`.
///
/// Fewer literal segments score higher; each de-prioritized term present
/// anywhere in the path (case-insensitive) subtracts
/// [`DEPRIORITIZED_PENALTY`].
#[must_use]
pub fn shape_score(capability: &Capability) -> f64 {
    let literals = capability.template().literal_count();
    let base = if literals == 0 {
        1.0
    } else {
        1.0 / f64::from(u32::try_from(literals).unwrap_or(u32::MAX))
    };

    let path = capability.path.to_ascii_lowercase();
    let hits = DEPRIORITIZED_TERMS
        .iter()
        .filter(|term| path.contains(**term))
        .count();
    let penalty = DEPRIORITIZED_PENALTY * f64::from(u32::try_from(hits).unwrap_or(u32::MAX));

    (base - penalty).clamp(0.0, 1.0)
}

/// Scores a single capability.
#[must_use]
pub fn score(capability: &Capability) -> f64 {
    let entity = f64::from(entity_priority(capability.entity_name.as_str()))
        / f64::from(MAX_ENTITY_PRIORITY);
    let action = f64::from(action_priority(capability.action)) / f64::from(MAX_ACTION_PRIORITY);
    let shape = shape_score(capability);

    (SHAPE_WEIGHT.mul_add(shape, ENTITY_WEIGHT.mul_add(entity, ACTION_WEIGHT * action)))
        .clamp(0.0, 1.0)
}

/// Returns the capabilities with their `score` set, in input order.
#[must_use]
pub fn score_all(capabilities: Vec<Capability>) -> Vec<Capability> {
    let scored: Vec<Capability> = capabilities
        .into_iter()
        .map(|cap| {
            let s = score(&cap);
            cap.with_score(s)
        })
        .collect();
    tracing::debug!("Scored {} capabilities", scored.len());
    scored
}

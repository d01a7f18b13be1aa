//! The capability model.
//!
//! A [`Capability`] is one normalized candidate endpoint of a product:
//! an `(entity, action)` pair bound to a concrete HTTP method and path.
//! Adapters produce [`RawEndpoint`] descriptors; [`normalize_endpoints`]
//! turns them into capabilities, dropping endpoints whose action cannot be
//! determined and duplicates of an already seen `(method, path)`.

use crate::path::PathTemplate;
use crate::types::{Action, EntityName, HttpMethod, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw endpoint descriptor produced by a product adapter.
///
/// `action` may be left empty; it is then derived from the method and the
/// presence of an identifier placeholder in the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEndpoint {
    /// Normalized entity the endpoint operates on
    pub entity_name: EntityName,
    /// Action, when the adapter could determine it
    pub action: Option<Action>,
    /// HTTP method as found in the API description
    pub http_method: String,
    /// Endpoint path template
    pub path: String,
}

/// One normalized candidate operation of a product.
///
/// # Examples
///
/// ```
/// use toolkit_engine_core::{Action, Capability, EntityName, HttpMethod, ProductId};
///
/// let cap = Capability::new(
///     ProductId::new("pipedrive"),
///     EntityName::new("contacts"),
///     Action::List,
///     HttpMethod::Get,
///     "/persons",
/// );
/// assert!(cap.score.is_none());
/// assert_eq!(cap.with_score(0.9).score, Some(0.9));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Capability {
    /// Product the endpoint belongs to
    pub product_id: ProductId,
    /// Normalized entity name
    pub entity_name: EntityName,
    /// Normalized action
    pub action: Action,
    /// HTTP method
    pub http_method: HttpMethod,
    /// Path template, may contain placeholders
    pub path: String,
    /// Usefulness score, absent until scored
    #[serde(default)]
    pub score: Option<f64>,
}

impl Capability {
    /// Creates an unscored capability.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        entity_name: EntityName,
        action: Action,
        http_method: HttpMethod,
        path: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            entity_name,
            action,
            http_method,
            path: path.into(),
            score: None,
        }
    }

    /// Returns a copy of this capability carrying `score`.
    #[must_use]
    pub fn with_score(self, score: f64) -> Self {
        Self {
            score: Some(score),
            ..self
        }
    }

    /// Returns the parsed path template.
    #[must_use]
    pub fn template(&self) -> PathTemplate {
        PathTemplate::parse(&self.path)
    }
}

/// Derives the action from an HTTP method and path shape.
///
/// | method        | identifier placeholder | action   |
/// |---------------|------------------------|----------|
/// | `GET`         | yes                    | `get`    |
/// | `GET`         | no                     | `list`   |
/// | `POST`        | no                     | `create` |
/// | `PUT`/`PATCH` | yes                    | `update` |
/// | `DELETE`      | yes                    | `delete` |
///
/// Every other combination has no action.
#[must_use]
pub const fn derive_action(method: HttpMethod, has_identifier: bool) -> Option<Action> {
    match (method, has_identifier) {
        (HttpMethod::Get, true) => Some(Action::Get),
        (HttpMethod::Get, false) => Some(Action::List),
        (HttpMethod::Post, false) => Some(Action::Create),
        (HttpMethod::Put | HttpMethod::Patch, true) => Some(Action::Update),
        (HttpMethod::Delete, true) => Some(Action::Delete),
        _ => None,
    }
}

/// Converts adapter output into capabilities for one discovery run.
///
/// Endpoints with an unsupported method or an undeterminable action are
/// dropped. Only the first occurrence of each `(method, path)` is kept, so
/// `(product_id, http_method, path)` is unique in the result. Input order is
/// preserved.
#[must_use]
pub fn normalize_endpoints(product_id: &ProductId, raw: Vec<RawEndpoint>) -> Vec<Capability> {
    let mut seen: HashSet<(HttpMethod, String)> = HashSet::new();
    let mut capabilities = Vec::with_capacity(raw.len());

    for endpoint in raw {
        let Ok(method) = endpoint.http_method.parse::<HttpMethod>() else {
            tracing::debug!(
                "Dropping {} {}: unsupported method",
                endpoint.http_method,
                endpoint.path
            );
            continue;
        };

        let action = endpoint.action.or_else(|| {
            derive_action(method, PathTemplate::parse(&endpoint.path).has_placeholders())
        });
        let Some(action) = action else {
            tracing::debug!("Dropping {} {}: no action", method, endpoint.path);
            continue;
        };

        if !seen.insert((method, endpoint.path.clone())) {
            tracing::debug!("Dropping duplicate endpoint {} {}", method, endpoint.path);
            continue;
        }

        capabilities.push(Capability::new(
            product_id.clone(),
            endpoint.entity_name,
            action,
            method,
            endpoint.path,
        ));
    }

    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(entity: &str, method: &str, path: &str) -> RawEndpoint {
        RawEndpoint {
            entity_name: EntityName::new(entity),
            action: None,
            http_method: method.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_derive_action_table() {
        assert_eq!(derive_action(HttpMethod::Get, false), Some(Action::List));
        assert_eq!(derive_action(HttpMethod::Get, true), Some(Action::Get));
        assert_eq!(derive_action(HttpMethod::Post, false), Some(Action::Create));
        assert_eq!(derive_action(HttpMethod::Post, true), None);
        assert_eq!(derive_action(HttpMethod::Put, true), Some(Action::Update));
        assert_eq!(derive_action(HttpMethod::Patch, true), Some(Action::Update));
        assert_eq!(derive_action(HttpMethod::Patch, false), None);
        assert_eq!(derive_action(HttpMethod::Delete, true), Some(Action::Delete));
        assert_eq!(derive_action(HttpMethod::Delete, false), None);
    }

    #[test]
    fn test_normalize_derives_actions() {
        let product = ProductId::new("pipedrive");
        let caps = normalize_endpoints(
            &product,
            vec![
                raw("contacts", "get", "/persons"),
                raw("contacts", "get", "/persons/{id}"),
                raw("contacts", "post", "/persons"),
                raw("contacts", "put", "/persons/{id}"),
                raw("contacts", "delete", "/persons/{id}"),
            ],
        );

        let actions: Vec<Action> = caps.iter().map(|c| c.action).collect();
        assert_eq!(actions, Action::ALL.to_vec());
        assert!(caps.iter().all(|c| c.product_id == product));
        assert!(caps.iter().all(|c| c.score.is_none()));
    }

    #[test]
    fn test_normalize_drops_undeterminable_and_unsupported() {
        let product = ProductId::new("p");
        let caps = normalize_endpoints(
            &product,
            vec![
                raw("contacts", "post", "/persons/{id}/merge"),
                raw("contacts", "options", "/persons"),
                raw("contacts", "delete", "/persons"),
            ],
        );
        assert!(caps.is_empty());
    }

    #[test]
    fn test_normalize_keeps_adapter_action() {
        let product = ProductId::new("p");
        let mut endpoint = raw("deals", "get", "/persons/{id}/deals");
        endpoint.action = Some(Action::List);
        let caps = normalize_endpoints(&product, vec![endpoint]);
        assert_eq!(caps[0].action, Action::List);
    }

    #[test]
    fn test_normalize_deduplicates_method_and_path() {
        let product = ProductId::new("p");
        let caps = normalize_endpoints(
            &product,
            vec![
                raw("contacts", "GET", "/persons"),
                raw("organisations", "get", "/persons"),
                raw("contacts", "POST", "/persons"),
            ],
        );
        assert_eq!(caps.len(), 2);
        assert_eq!(caps[0].entity_name.as_str(), "contacts");
        assert_eq!(caps[1].http_method, HttpMethod::Post);
    }

    #[test]
    fn test_capability_serde_roundtrip_keeps_score() {
        let cap = Capability::new(
            ProductId::new("hubspot"),
            EntityName::new("deals"),
            Action::Get,
            HttpMethod::Get,
            "/crm/v3/objects/deals/{dealId}",
        )
        .with_score(0.75);

        let json = serde_json::to_value(&cap).unwrap();
        assert_eq!(json["http_method"], "GET");
        assert_eq!(json["action"], "get");

        let back: Capability = serde_json::from_value(json).unwrap();
        assert_eq!(back, cap);
    }
}

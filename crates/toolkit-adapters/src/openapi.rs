//! Helpers shared by OpenAPI-based adapters.
//!
//! Only the `paths` object of a description is walked. For every path the
//! entity is the last literal segment found in the adapter's keyword table,
//! and the path addresses a single record when a placeholder follows that
//! segment.

use serde_json::Value;
use std::time::Duration;
use toolkit_engine_core::{
    EntityName, Error, HttpMethod, PathTemplate, ProductId, RawEndpoint, Result, Segment,
    derive_action,
};

/// Maps path keywords (lowercase) to normalized entity names.
pub type EntityKeywords = &'static [(&'static str, &'static str)];

/// Entity detected in a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedEntity {
    /// Normalized entity name
    pub entity: EntityName,
    /// Whether a placeholder follows the entity segment
    pub has_identifier: bool,
}

/// Finds the entity a path operates on.
///
/// # Examples
///
/// ```
/// use toolkit_engine_adapters::openapi::detect_entity;
///
/// let keywords = &[("persons", "contacts"), ("deals", "deals")];
///
/// let found = detect_entity("/persons/{id}", keywords).unwrap();
/// assert_eq!(found.entity.as_str(), "contacts");
/// assert!(found.has_identifier);
///
/// let nested = detect_entity("/persons/{id}/deals", keywords).unwrap();
/// assert_eq!(nested.entity.as_str(), "deals");
/// assert!(!nested.has_identifier);
///
/// assert!(detect_entity("/users", keywords).is_none());
/// ```
#[must_use]
pub fn detect_entity(path: &str, keywords: EntityKeywords) -> Option<DetectedEntity> {
    let template = PathTemplate::parse(path);
    let segments = template.segments();

    segments.iter().enumerate().rev().find_map(|(i, segment)| {
        let Segment::Literal(text) = segment else {
            return None;
        };
        let text = text.to_ascii_lowercase();
        let (_, entity) = keywords.iter().find(|(keyword, _)| *keyword == text)?;
        Some(DetectedEntity {
            entity: EntityName::new(*entity),
            has_identifier: segments[i + 1..].iter().any(Segment::is_placeholder),
        })
    })
}

/// Walks the `paths` object and emits one descriptor per recognized
/// operation.
///
/// Only methods in `methods` are considered. The action is derived from the
/// method and whether the entity segment is followed by an identifier;
/// operations without a derivable action are skipped.
#[must_use]
pub fn extract_endpoints(
    spec: &Value,
    keywords: EntityKeywords,
    methods: &[HttpMethod],
) -> Vec<RawEndpoint> {
    let Some(paths) = spec.get("paths").and_then(Value::as_object) else {
        tracing::debug!("API description has no paths object");
        return Vec::new();
    };
    tracing::debug!("Found {} paths in API description", paths.len());

    let mut endpoints = Vec::new();
    for (path, operations) in paths {
        let Some(operations) = operations.as_object() else {
            continue;
        };
        let Some(detected) = detect_entity(path, keywords) else {
            continue;
        };

        for key in operations.keys() {
            let Ok(method) = key.parse::<HttpMethod>() else {
                continue;
            };
            if !methods.contains(&method) {
                continue;
            }
            let Some(action) = derive_action(method, detected.has_identifier) else {
                continue;
            };

            tracing::debug!(
                "Extracted capability: {}.{} {} {}",
                detected.entity,
                action,
                method,
                path
            );
            endpoints.push(RawEndpoint {
                entity_name: detected.entity.clone(),
                action: Some(action),
                http_method: method.as_str().to_string(),
                path: path.clone(),
            });
        }
    }

    tracing::info!("Extracted {} capabilities from API description", endpoints.len());
    endpoints
}

/// Builds the HTTP client used for discovery.
///
/// # Errors
///
/// Returns [`Error::Discovery`] if the client cannot be built.
pub fn discovery_client(product_id: &ProductId, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| discovery_error(product_id, "failed to build HTTP client", e))
}

/// Fetches a JSON API description.
///
/// # Errors
///
/// Returns [`Error::Discovery`] on transport errors, non-2xx responses or
/// non-JSON bodies.
pub async fn fetch_spec(
    client: &reqwest::Client,
    product_id: &ProductId,
    url: &str,
) -> Result<Value> {
    tracing::info!("Discovering {} API description from {}", product_id, url);

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| discovery_error(product_id, "failed to connect", e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Discovery {
            product: product_id.to_string(),
            message: format!("failed to retrieve API description: HTTP {}", status.as_u16()),
            source: None,
        });
    }

    let spec: Value = response
        .json()
        .await
        .map_err(|e| discovery_error(product_id, "API description is not valid JSON", e))?;

    tracing::info!("Retrieved {} API description", product_id);
    Ok(spec)
}

fn discovery_error(product_id: &ProductId, message: &str, source: reqwest::Error) -> Error {
    Error::Discovery {
        product: product_id.to_string(),
        message: format!("{message}: {source}"),
        source: Some(Box::new(source)),
    }
}

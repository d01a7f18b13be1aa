//! Credentials and resolved authentication.
//!
//! Credential values are held as [`SecretString`] and never appear in
//! `Debug` output. Product adapters turn [`Credentials`] into a
//! [`ResolvedAuth`]: the headers and query parameters attached to every
//! request of a generated client.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

/// Credential fields keyed by name (e.g. `api_token`, `access_token`).
///
/// # Examples
///
/// ```
/// use toolkit_engine_core::Credentials;
///
/// let mut creds = Credentials::new();
/// creds.insert("access_token", "secret");
///
/// assert_eq!(creds.get("access_token"), Some("secret"));
/// assert!(!format!("{creds:?}").contains("secret"));
/// ```
#[derive(Default)]
pub struct Credentials {
    fields: BTreeMap<String, SecretString>,
}

impl Credentials {
    /// Creates an empty credential set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a field.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields
            .insert(key.into(), SecretString::from(value.into()));
    }

    /// Returns the exposed value of a field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(ExposeSecret::expose_secret)
    }

    /// Returns a non-empty field or a configuration error naming it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the field is absent or blank.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config {
                message: format!("credentials must include '{key}'"),
            })
    }

    /// Parses a `key=value` pair.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if there is no `=` or the key is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use toolkit_engine_core::Credentials;
    ///
    /// let (key, value) = Credentials::parse_pair("api_token=abc=").unwrap();
    /// assert_eq!(key, "api_token");
    /// assert_eq!(value, "abc=");
    /// assert!(Credentials::parse_pair("api_token").is_err());
    /// ```
    pub fn parse_pair(pair: &str) -> Result<(String, String)> {
        match pair.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                Ok((key.trim().to_string(), value.to_string()))
            }
            _ => Err(Error::Config {
                message: format!("invalid credential '{pair}' (expected key=value)"),
            }),
        }
    }

    /// Returns `true` if no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("keys", &self.fields.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Credentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut creds = Self::new();
        for (k, v) in iter {
            creds.insert(k, v);
        }
        creds
    }
}

/// Authentication attached to every request of a generated client.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ResolvedAuth {
    /// Headers merged into each request
    pub headers: BTreeMap<String, String>,
    /// Query parameters appended to each request
    pub query: Vec<(String, String)>,
}

impl ResolvedAuth {
    /// Auth consisting of headers only.
    #[must_use]
    pub fn from_headers(headers: BTreeMap<String, String>) -> Self {
        Self {
            headers,
            query: Vec::new(),
        }
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

impl fmt::Debug for ResolvedAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedAuth")
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field(
                "query",
                &self.query.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_missing_and_blank() {
        let creds: Credentials = [("api_token", "  ")].into_iter().collect();
        assert!(creds.require("api_token").unwrap_err().is_config_error());
        assert!(creds.require("access_token").is_err());
    }

    #[test]
    fn test_require_present() {
        let creds: Credentials = [("access_token", "tok")].into_iter().collect();
        assert_eq!(creds.require("access_token").unwrap(), "tok");
    }

    #[test]
    fn test_parse_pair_rejects_empty_key() {
        assert!(Credentials::parse_pair("=value").is_err());
        assert_eq!(
            Credentials::parse_pair("k=").unwrap(),
            ("k".to_string(), String::new())
        );
    }

    #[test]
    fn test_keys_sorted() {
        let creds: Credentials = [("b", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(creds.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(!creds.is_empty());
    }

    #[test]
    fn test_resolved_auth_debug_redacts_values() {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "Bearer hidden".to_string());
        let auth = ResolvedAuth::from_headers(headers).with_query("api_token", "hidden2");

        let debug = format!("{auth:?}");
        assert!(debug.contains("Authorization"));
        assert!(debug.contains("api_token"));
        assert!(!debug.contains("hidden"));
    }
}

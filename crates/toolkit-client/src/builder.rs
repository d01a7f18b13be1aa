//! Client builder.

use crate::client::GeneratedClient;
use crate::operation::OperationTable;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use toolkit_engine_core::{Credentials, EngineConfig, Error, ResolvedAuth, Result, RetryPolicy};
use toolkit_engine_selection::Mapping;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Assembles a [`GeneratedClient`] from a mapping.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use toolkit_engine_client::ClientBuilder;
/// use toolkit_engine_core::{Credentials, ProductId, ResolvedAuth, RetryPolicy};
/// use toolkit_engine_selection::Mapping;
///
/// let mapping = Mapping::new(ProductId::new("pipedrive"));
/// let creds: Credentials = [("api_token", "abc")].into_iter().collect();
///
/// let client = ClientBuilder::new()
///     .timeout(Duration::from_secs(5))
///     .retry(RetryPolicy::no_retry())
///     .build(&mapping, "https://api.pipedrive.com/v1", &creds, |c| {
///         Ok(ResolvedAuth::default().with_query("api_token", c.require("api_token")?))
///     })
///     .unwrap();
/// assert_eq!(client.base_url(), "https://api.pipedrive.com/v1");
/// ```
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    timeout: Duration,
    retry: RetryPolicy,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }
}

impl ClientBuilder {
    /// Builder with default timeout and retry policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder using the configured timeout and retry policy.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            timeout: config.request_timeout,
            retry: config.retry.clone(),
        }
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Builds the client.
    ///
    /// `auth_fn` runs exactly once, before anything else; its error aborts
    /// the build.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for credentials rejected by `auth_fn` or
    /// unusable as HTTP header values, a base URL that is not an absolute http(s) URL, or a transport that
    /// cannot be created.
    pub fn build<F>(
        &self,
        mapping: &Mapping,
        base_url: &str,
        credentials: &Credentials,
        auth_fn: F,
    ) -> Result<GeneratedClient>
    where
        F: FnOnce(&Credentials) -> Result<ResolvedAuth>,
    {
        let auth = auth_fn(credentials)?;
        let auth_headers = header_map(&auth)?;
        let base_url = validate_base_url(base_url)?;
        let table = OperationTable::from_mapping(mapping);

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {e}"),
            })?;

        tracing::info!(
            "Built client for {} with {} operations",
            mapping.product_id,
            table.len()
        );
        Ok(GeneratedClient::new(
            mapping.product_id.clone(),
            base_url,
            table,
            auth_headers,
            auth.query,
            self.retry.clone(),
            http,
        ))
    }
}

/// Builds a client with default settings.
///
/// # Errors
///
/// See [`ClientBuilder::build`].
pub fn build<F>(
    mapping: &Mapping,
    base_url: &str,
    credentials: &Credentials,
    auth_fn: F,
) -> Result<GeneratedClient>
where
    F: FnOnce(&Credentials) -> Result<ResolvedAuth>,
{
    ClientBuilder::new().build(mapping, base_url, credentials, auth_fn)
}

/// Converts auth headers, marking every value sensitive.
fn header_map(auth: &ResolvedAuth) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(auth.headers.len());
    for (name, value) in &auth.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| Error::Config {
            message: format!("invalid auth header name '{name}'"),
        })?;
        let mut header_value = HeaderValue::from_str(value).map_err(|_| Error::Config {
            message: format!("credential for header '{name}' contains characters not allowed in HTTP headers"),
        })?;
        header_value.set_sensitive(true);
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Checks for an absolute http(s) URL and strips trailing slashes.
fn validate_base_url(base_url: &str) -> Result<String> {
    let invalid = |reason: &str| Error::Config {
        message: format!("invalid base URL '{base_url}': {reason}"),
    };

    let url = reqwest::Url::parse(base_url).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed"));
    }

    Ok(base_url.trim_end_matches('/').to_string())
}

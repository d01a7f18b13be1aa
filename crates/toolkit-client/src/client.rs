//! Generated client.

use crate::operation::{OperationArgs, OperationOutput, OperationTable, RequestSpec, operation_name};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap};
use serde_json::Value;
use std::fmt;
use toolkit_engine_core::{Action, EntityName, Error, HttpMethod, ProductId, Result, RetryPolicy};

/// Uniform client over one product's mapped endpoints.
///
/// Operations take `&self`, so a client can be shared by concurrent callers.
/// The transport is owned by the client and released by [`close`] or on
/// drop; any operation after `close` fails with [`Error::ClosedClient`].
///
/// [`close`]: GeneratedClient::close
pub struct GeneratedClient {
    product_id: ProductId,
    base_url: String,
    table: OperationTable,
    auth_headers: HeaderMap,
    auth_query: Vec<(String, String)>,
    retry: RetryPolicy,
    http: Option<reqwest::Client>,
}

impl fmt::Debug for GeneratedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedClient")
            .field("product_id", &self.product_id)
            .field("base_url", &self.base_url)
            .field("operations", &self.table.len())
            .field("auth_headers", &self.auth_headers.keys().collect::<Vec<_>>())
            .field(
                "auth_query",
                &self.auth_query.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            )
            .field("retry", &self.retry)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Outcome of one send attempt.
enum Attempt {
    Done(Option<Value>),
    Transient(Error),
    Fatal(Error),
}

impl GeneratedClient {
    pub(crate) const fn new(
        product_id: ProductId,
        base_url: String,
        table: OperationTable,
        auth_headers: HeaderMap,
        auth_query: Vec<(String, String)>,
        retry: RetryPolicy,
        http: reqwest::Client,
    ) -> Self {
        Self {
            product_id,
            base_url,
            table,
            auth_headers,
            auth_query,
            retry,
            http: Some(http),
        }
    }

    /// Product this client talks to.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Base URL endpoint paths are joined to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Names of the available operations, sorted.
    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.table.names()
    }

    /// Returns `true` once [`close`](Self::close) has been called.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.http.is_none()
    }

    /// Releases the transport. Idempotent.
    pub fn close(&mut self) {
        if self.http.take().is_some() {
            tracing::debug!("Closed client for {}", self.product_id);
        }
    }

    /// Runs an operation by name, e.g. `list_contacts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedOperation`] for unknown names, otherwise
    /// as [`execute`](Self::execute).
    pub async fn call(&self, name: &str, args: OperationArgs) -> Result<OperationOutput> {
        let key = self
            .table
            .resolve(name)
            .ok_or_else(|| Error::UnsupportedOperation {
                operation: name.to_string(),
            })?;
        self.execute(&key.entity, key.action, args).await
    }

    /// Lists records of an entity.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute).
    pub async fn list(&self, entity: &str, args: OperationArgs) -> Result<Vec<Value>> {
        self.execute(&EntityName::new(entity), Action::List, args)
            .await
            .map(OperationOutput::into_records)
    }

    /// Fetches one record.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute).
    pub async fn get(&self, entity: &str, id: &str) -> Result<Value> {
        let output = self
            .execute(&EntityName::new(entity), Action::Get, OperationArgs::new().with_id(id))
            .await?;
        Ok(into_record(output))
    }

    /// Creates a record and returns the server's response.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute).
    pub async fn create(&self, entity: &str, body: Value) -> Result<Value> {
        let output = self
            .execute(&EntityName::new(entity), Action::Create, OperationArgs::new().with_body(body))
            .await?;
        Ok(into_record(output))
    }

    /// Updates a record and returns the server's response.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute).
    pub async fn update(&self, entity: &str, id: &str, body: Value) -> Result<Value> {
        let args = OperationArgs::new().with_id(id).with_body(body);
        let output = self
            .execute(&EntityName::new(entity), Action::Update, args)
            .await?;
        Ok(into_record(output))
    }

    /// Deletes a record. Returns `true` on confirmation.
    ///
    /// # Errors
    ///
    /// As [`execute`](Self::execute).
    pub async fn delete(&self, entity: &str, id: &str) -> Result<bool> {
        let output = self
            .execute(&EntityName::new(entity), Action::Delete, OperationArgs::new().with_id(id))
            .await?;
        Ok(output.is_deleted())
    }

    /// Runs the operation mapped for `(entity, action)`.
    ///
    /// # Errors
    ///
    /// - [`Error::ClosedClient`] after `close`
    /// - [`Error::UnsupportedOperation`] if the pair is not mapped
    /// - [`Error::MissingParameter`] if the identifier or a placeholder
    ///   value is missing; no request is sent
    /// - [`Error::Api`] on a non-retryable failure or when retries are
    ///   exhausted
    pub async fn execute(
        &self,
        entity: &EntityName,
        action: Action,
        args: OperationArgs,
    ) -> Result<OperationOutput> {
        let http = self.http.as_ref().ok_or(Error::ClosedClient)?;
        let operation = operation_name(entity, action);
        let spec = self
            .table
            .get(entity, action)
            .ok_or_else(|| Error::UnsupportedOperation {
                operation: operation.clone(),
            })?;

        if action.requires_identifier() && args.id.is_none() {
            return Err(Error::MissingParameter {
                operation,
                parameter: "id".to_string(),
            });
        }

        let url = format!("{}{}", self.base_url, render_path(spec, &args, &operation)?);
        let body = action
            .is_write()
            .then(|| args.body.clone().unwrap_or_else(|| Value::Object(serde_json::Map::new())));
        let retry_network = !action.is_write() || self.retry.retry_writes_on_network_error;
        let max_attempts = self.retry.max_attempts.max(1);

        tracing::debug!("{} -> {} {}", operation, spec.method, url);

        let mut attempt = 1;
        loop {
            let err = match self.send(http, spec, &url, &args, body.as_ref(), retry_network).await {
                Attempt::Done(value) => return Ok(spec.response_shape.extract(value)),
                Attempt::Fatal(err) => return Err(err),
                Attempt::Transient(err) => err,
            };

            if attempt >= max_attempts {
                tracing::warn!("{} failed after {} attempts: {}", operation, attempt, err);
                return Err(err);
            }

            let delay = self.retry.backoff_for(attempt);
            tracing::warn!(
                "{} attempt {}/{} failed: {}, retrying in {:?}",
                operation,
                attempt,
                max_attempts,
                err,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }

    async fn send(
        &self,
        http: &reqwest::Client,
        spec: &RequestSpec,
        url: &str,
        args: &OperationArgs,
        body: Option<&Value>,
        retry_network: bool,
    ) -> Attempt {
        let mut request = http
            .request(to_reqwest_method(spec.method), url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .headers(self.auth_headers.clone());
        if !args.query.is_empty() {
            request = request.query(&args.query);
        }
        if !self.auth_query.is_empty() {
            request = request.query(&self.auth_query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let err = Error::Api {
                    status: None,
                    body: e.to_string(),
                };
                return if retry_network {
                    Attempt::Transient(err)
                } else {
                    Attempt::Fatal(err)
                };
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                let err = Error::Api {
                    status: Some(status.as_u16()),
                    body: e.to_string(),
                };
                return if body_failure_is_transient(status, retry_network) {
                    Attempt::Transient(err)
                } else {
                    Attempt::Fatal(err)
                };
            }
        };

        if status.is_success() {
            if text.trim().is_empty() {
                return Attempt::Done(None);
            }
            return match serde_json::from_str(&text) {
                Ok(value) => Attempt::Done(Some(value)),
                Err(e) => Attempt::Fatal(e.into()),
            };
        }

        let err = Error::Api {
            status: Some(status.as_u16()),
            body: text,
        };
        if is_transient_status(status) {
            Attempt::Transient(err)
        } else {
            Attempt::Fatal(err)
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

/// A body lost after the server answered is retried only when the status is
/// transient or resending the request is allowed.
fn body_failure_is_transient(status: StatusCode, retry_network: bool) -> bool {
    is_transient_status(status) || retry_network
}

fn into_record(output: OperationOutput) -> Value {
    match output {
        OperationOutput::Record(record) => record,
        OperationOutput::Records(records) => Value::Array(records),
        OperationOutput::Deleted => Value::Null,
    }
}

/// Fills placeholders from `path_params`; the last one falls back to the id.
fn render_path(spec: &RequestSpec, args: &OperationArgs, operation: &str) -> Result<String> {
    let template = &spec.path_template;
    let last = template.placeholders().last().map(|name| (*name).to_string());

    template
        .render(|name| {
            args.path_params.get(name).cloned().or_else(|| {
                if last.as_deref() == Some(name) {
                    args.id.clone()
                } else {
                    None
                }
            })
        })
        .map_err(|parameter| Error::MissingParameter {
            operation: operation.to_string(),
            parameter,
        })
}

const fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

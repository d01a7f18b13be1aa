//! Generated client behavior against a mock product API.

use serde_json::json;
use std::collections::BTreeMap;
use std::time::Duration;
use toolkit_engine_client::{ClientBuilder, GeneratedClient, OperationArgs, OperationOutput};
use toolkit_engine_core::{
    Action, Credentials, EntityName, Error, HttpMethod, ProductId, ResolvedAuth, Result,
    RetryPolicy,
};
use toolkit_engine_selection::{GroupKey, Mapping, MappingEntry};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mapping() -> Mapping {
    let mut mapping = Mapping::new(ProductId::new("pipedrive"));
    for (entity, action, http_method, path) in [
        ("contacts", Action::List, HttpMethod::Get, "/persons"),
        ("contacts", Action::Get, HttpMethod::Get, "/persons/{id}"),
        ("contacts", Action::Create, HttpMethod::Post, "/persons"),
        ("contacts", Action::Update, HttpMethod::Put, "/persons/{id}"),
        ("contacts", Action::Delete, HttpMethod::Delete, "/persons/{id}"),
    ] {
        mapping
            .insert(
                GroupKey::new(EntityName::new(entity), action),
                MappingEntry {
                    http_method,
                    path: path.to_string(),
                    score: Some(1.0),
                },
            )
            .unwrap();
    }
    mapping
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        retry_writes_on_network_error: false,
    }
}

fn token_auth(credentials: &Credentials) -> Result<ResolvedAuth> {
    Ok(ResolvedAuth::default().with_query("api_token", credentials.require("api_token")?))
}

fn bearer_auth(credentials: &Credentials) -> Result<ResolvedAuth> {
    let token = credentials.require("access_token")?;
    let mut headers = BTreeMap::new();
    headers.insert("Authorization".to_string(), format!("Bearer {token}"));
    Ok(ResolvedAuth::from_headers(headers))
}

fn client(server: &MockServer) -> GeneratedClient {
    let creds: Credentials = [("api_token", "secret")].into_iter().collect();
    ClientBuilder::new()
        .retry(fast_retry())
        .build(&mapping(), &server.uri(), &creds, token_auth)
        .unwrap()
}

/// `list_contacts` hits exactly the recorded method and path.
#[tokio::test]
async fn test_list_hits_recorded_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/persons"))
        .and(query_param("api_token", "secret"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1, "name": "Ada"}, {"id": 2, "name": "Grace"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let output = client(&server)
        .call("list_contacts", OperationArgs::new())
        .await
        .unwrap();
    let records = output.into_records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "Ada");
}

/// Caller query parameters are sent alongside auth parameters.
#[tokio::test]
async fn test_caller_query_and_auth_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/persons"))
        .and(query_param("limit", "5"))
        .and(query_param("api_token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .list("contacts", OperationArgs::new().with_query("limit", "5"))
        .await
        .unwrap();
    assert!(records.is_empty());
}

/// Auth headers are attached to each request.
#[tokio::test]
async fn test_bearer_header_attached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/persons/9"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "9"})))
        .expect(1)
        .mount(&server)
        .await;

    let creds: Credentials = [("access_token", "tok")].into_iter().collect();
    let client = ClientBuilder::new()
        .build(&mapping(), &server.uri(), &creds, bearer_auth)
        .unwrap();
    let record = client.get("contacts", "9").await.unwrap();
    assert_eq!(record, json!({"id": "9"}));
}

/// Credentials `{}` for an adapter requiring `access_token` fail before
/// any network call.
#[tokio::test]
async fn test_empty_credentials_fail_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = ClientBuilder::new()
        .build(&mapping(), &server.uri(), &Credentials::new(), bearer_auth)
        .unwrap_err();
    assert!(err.is_config_error());
}

/// `create_contact` receiving 500 is retried up to the bound.
#[tokio::test]
async fn test_server_error_retried_then_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/persons"))
        .and(body_json(json!({"name": "Ada"})))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(3)
        .mount(&server)
        .await;

    let err = client(&server)
        .create("contacts", json!({"name": "Ada"}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: Some(500), ref body } if body == "boom"));
}

/// 429 is transient and a later success is returned.
#[tokio::test]
async fn test_rate_limit_then_success() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/persons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": 1}]})))
        .expect(1)
        .mount(&server)
        .await;

    let records = client(&server)
        .list("contacts", OperationArgs::new())
        .await
        .unwrap();
    assert_eq!(records, vec![json!({"id": 1})]);
}

/// Client errors other than 429 are not retried.
#[tokio::test]
async fn test_client_error_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/persons/5"))
        .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server)
        .update("contacts", "5", json!({"name": "x"}))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
}

/// `get_contact` without an identifier sends nothing.
#[tokio::test]
async fn test_missing_identifier_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = client(&server)
        .call("get_contact", OperationArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingParameter { ref operation, ref parameter }
            if operation == "get_contact" && parameter == "id"
    ));
}

/// Delete returns a confirmation without data.
#[tokio::test]
async fn test_delete_confirmation() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/persons/3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let output = client(&server)
        .call("delete_contact", OperationArgs::new().with_id("3"))
        .await
        .unwrap();
    assert_eq!(output, OperationOutput::Deleted);
}

/// Unmapped operations are rejected.
#[tokio::test]
async fn test_unsupported_operation() {
    let server = MockServer::start().await;
    let client = client(&server);

    let err = client
        .call("list_invoices", OperationArgs::new())
        .await
        .unwrap_err();
    assert!(err.is_unsupported_operation());

    let err = client
        .execute(&EntityName::new("deals"), Action::List, OperationArgs::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedOperation { ref operation } if operation == "list_deals"));
}

/// Any call after `close` fails.
#[tokio::test]
async fn test_call_after_close() {
    let server = MockServer::start().await;
    let mut client = client(&server);
    client.close();
    client.close();

    assert!(client.is_closed());
    let err = client
        .call("list_contacts", OperationArgs::new())
        .await
        .unwrap_err();
    assert!(err.is_closed_client());
}

/// Network errors on writes are not retried unless opted in.
#[tokio::test]
async fn test_network_error_on_write_not_retried() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let creds: Credentials = [("api_token", "secret")].into_iter().collect();
    let client = ClientBuilder::new()
        .retry(fast_retry())
        .build(&mapping(), &uri, &creds, token_auth)
        .unwrap();

    let err = client
        .create("contacts", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Api { status: None, .. }));
}

/// A token that cannot travel in a header fails the build, not the call.
#[tokio::test]
async fn test_header_unsafe_token_fails_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let creds: Credentials = [("access_token", "tok\nevil")].into_iter().collect();
    let err = ClientBuilder::new()
        .build(&mapping(), &server.uri(), &creds, bearer_auth)
        .unwrap_err();
    assert!(err.is_config_error());
}

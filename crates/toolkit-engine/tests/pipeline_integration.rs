//! End-to-end pipeline against a mock product.

use serde_json::json;
use tempfile::TempDir;
use toolkit_engine::Engine;
use toolkit_engine_adapters::AdapterOptions;
use toolkit_engine_client::OperationArgs;
use toolkit_engine_core::{
    Action, AuthMethod, Credentials, EngineConfig, EntityName, HttpMethod, ProductDefinition,
    ProductId, ProductType, Result,
};
use toolkit_engine_selection::RankedGroup;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipedrive_spec() -> serde_json::Value {
    json!({
        "openapi": "3.0.1",
        "paths": {
            "/persons": {"get": {}, "post": {}},
            "/persons/collection": {"get": {}},
            "/persons/{id}": {"get": {}, "put": {}, "delete": {}},
            "/deals": {"get": {}, "post": {}},
            "/deals/{id}": {"get": {}}
        }
    })
}

async fn setup() -> (TempDir, MockServer, Engine, ProductId) {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/openapi.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(pipedrive_spec()))
        .mount(&server)
        .await;

    let mut engine = Engine::new(EngineConfig::from_home(temp.path()).unwrap()).unwrap();
    engine
        .register_product(ProductDefinition::new(
            "pipedrive",
            "Pipedrive",
            ProductType::Crm,
            format!("{}/v1", server.uri()),
            AuthMethod::ApiKey,
        ))
        .unwrap();

    (temp, server, engine, ProductId::new("pipedrive"))
}

fn spec_options(server: &MockServer) -> AdapterOptions {
    AdapterOptions::default().with_spec_url(format!("{}/openapi.json", server.uri()))
}

/// Discovery persists the raw description and the capabilities.
#[tokio::test]
async fn test_discover_persists_records() {
    let (temp, server, engine, id) = setup().await;

    let catalog = engine.discover(&id, spec_options(&server)).await.unwrap();
    assert_eq!(catalog.total_capabilities, 9);

    assert!(temp.path().join("pipedrive_raw_spec.json").exists());
    assert!(temp.path().join("pipedrive_capabilities.json").exists());
    assert_eq!(engine.capabilities(&id).unwrap(), catalog);
}

/// Automatic selection prefers the canonical collection path.
#[tokio::test]
async fn test_auto_select_prefers_canonical_path() {
    let (_temp, server, engine, id) = setup().await;
    engine.discover(&id, spec_options(&server)).await.unwrap();

    let mapping = engine.select(&id, None).unwrap();
    let entry = mapping
        .entry(&EntityName::new("contacts"), Action::List)
        .unwrap();
    assert_eq!(entry.http_method, HttpMethod::Get);
    assert_eq!(entry.path, "/persons");
    assert_eq!(mapping.len(), 8);
    assert_eq!(engine.mapping(&id).unwrap(), mapping);
}

/// Interactive selection asks only for ambiguous groups.
#[tokio::test]
async fn test_interactive_select() {
    let (_temp, server, engine, id) = setup().await;
    engine.discover(&id, spec_options(&server)).await.unwrap();

    let mut asked = Vec::new();
    let mut chooser = |group: &RankedGroup| -> Result<String> {
        asked.push(group.key.to_string());
        Ok("1".to_string())
    };
    let mapping = engine.select(&id, Some(&mut chooser)).unwrap();

    assert_eq!(asked, vec!["contacts.list".to_string()]);
    assert_eq!(
        mapping
            .entry(&EntityName::new("contacts"), Action::List)
            .unwrap()
            .path,
        "/persons/collection"
    );
}

/// The generated client calls the selected endpoint with auth.
#[tokio::test]
async fn test_generated_client_lists_contacts() {
    let (_temp, server, engine, id) = setup().await;
    engine.discover(&id, spec_options(&server)).await.unwrap();
    engine.select(&id, None).unwrap();

    Mock::given(method("GET"))
        .and(path("/v1/persons"))
        .and(query_param("api_token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{"id": 1, "name": "Ada"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let creds: Credentials = [("api_token", "secret")].into_iter().collect();
    let mut client = engine.generate_client(&id, &creds).unwrap();
    let contacts = client
        .list("contacts", OperationArgs::new())
        .await
        .unwrap();
    assert_eq!(contacts, vec![json!({"id": 1, "name": "Ada"})]);

    client.close();
    assert!(client.is_closed());
}

/// Missing credentials fail before any request.
#[tokio::test]
async fn test_generate_client_requires_credentials() {
    let (_temp, server, engine, id) = setup().await;
    engine.discover(&id, spec_options(&server)).await.unwrap();
    engine.select(&id, None).unwrap();

    let err = engine
        .generate_client(&id, &Credentials::new())
        .unwrap_err();
    assert!(err.is_config_error());
}

/// Discovery of a product without an adapter fails.
#[tokio::test]
async fn test_discover_without_adapter() {
    let temp = TempDir::new().unwrap();
    let mut engine = Engine::new(EngineConfig::from_home(temp.path()).unwrap()).unwrap();
    engine
        .register_product(ProductDefinition::new(
            "xero",
            "Xero",
            ProductType::Accounting,
            "https://api.xero.com",
            AuthMethod::Oauth2,
        ))
        .unwrap();

    let err = engine
        .discover(&ProductId::new("xero"), AdapterOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        toolkit_engine_core::Error::AdapterNotFound { .. }
    ));
}

/// Equal-score candidates keep the order of the API description.
#[tokio::test]
async fn test_tied_update_keeps_document_order() {
    let temp = TempDir::new().unwrap();
    let server = MockServer::start().await;
    let spec = r#"{
        "openapi": "3.0.1",
        "paths": {
            "/crm/v3/objects/contacts/{contactId}": {"put": {}, "patch": {}},
            "/crm/v3/objects/contacts": {"get": {}}
        }
    }"#;
    Mock::given(method("GET"))
        .and(path("/crm/v3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(spec, "application/json"))
        .mount(&server)
        .await;

    let mut engine = Engine::new(EngineConfig::from_home(temp.path()).unwrap()).unwrap();
    engine
        .register_product(ProductDefinition::new(
            "hubspot",
            "HubSpot",
            ProductType::Crm,
            server.uri(),
            AuthMethod::Oauth2,
        ))
        .unwrap();
    let id = ProductId::new("hubspot");

    let catalog = engine
        .discover(
            &id,
            AdapterOptions::default().with_spec_url(format!("{}/crm/v3", server.uri())),
        )
        .await
        .unwrap();
    let methods: Vec<HttpMethod> = catalog.capabilities.iter().map(|c| c.http_method).collect();
    assert_eq!(methods, vec![HttpMethod::Put, HttpMethod::Patch, HttpMethod::Get]);

    let mapping = engine.select(&id, None).unwrap();
    let update = mapping
        .entry(&EntityName::new("contacts"), Action::Update)
        .unwrap();
    assert_eq!(update.http_method, HttpMethod::Put);
}

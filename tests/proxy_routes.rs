//! End-to-end tests: real listener, stub backend, temp code directory.

mod common;

use std::fs;
use std::sync::Arc;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::*;
use unicorn_proxy::{HttpServer, SecretProvider, SecretSource};

const SECRET_HEADER: &str = "x-unicorn-api-secret";

fn is_hex_secret(value: &str) -> bool {
    value.len() >= 32 && value.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
}

#[tokio::test]
async fn test_healthcheck_never_contacts_backend() {
    let backend = start_stub_backend(200, "{}").await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    for path in ["/healthcheck", "/"] {
        let response = client().get(proxy.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body, json!({ "status": "OK" }));
    }

    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_get_unicorn_attaches_and_echoes_secret() {
    let backend = start_stub_backend(200, r#"{"name":"Sparkle"}"#).await;
    let dir = code_dir();
    let config = config_for(&dir);
    let expected = SecretProvider::for_deployment(&config.artifacts)
        .get_secret()
        .unwrap();
    let proxy = spawn_proxy(HttpServer::new(config, backend.url()).unwrap()).await;

    let response = client().get(proxy.url("/unicorns/42")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let echoed = response
        .headers()
        .get(SECRET_HEADER)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(is_hex_secret(&echoed));
    assert_eq!(echoed, expected.as_str());

    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "name": "Sparkle" }));

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/unicorns/42");
    assert_eq!(requests[0].headers.get(SECRET_HEADER).unwrap(), echoed.as_str());
}

#[tokio::test]
async fn test_list_unicorns_is_unauthenticated() {
    let backend = start_stub_backend(200, r#"[{"name":"Sparkle"}]"#).await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client().get(proxy.url("/unicorn")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SECRET_HEADER).is_none());

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/unicorn");
    assert!(requests[0].headers.get(SECRET_HEADER).is_none());
}

#[tokio::test]
async fn test_feed_forwards_only_snack_and_teamid() {
    let backend = start_stub_backend(200, r#"{"fed":true}"#).await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client()
        .post(proxy.url("/unicorns/7"))
        .json(&json!({ "snack": "apple", "teamid": "t1", "extra": "x" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SECRET_HEADER).is_none());

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/unicorns/7");
    assert!(requests[0].headers.get(SECRET_HEADER).is_none());
    assert_eq!(requests[0].json(), json!({ "snack": "apple", "teamid": "t1" }));
}

#[tokio::test]
async fn test_feed_with_missing_field_is_not_forwarded() {
    let backend = start_stub_backend(200, "{}").await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client()
        .post(proxy.url("/unicorns/7"))
        .json(&json!({ "snack": "apple" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client()
        .post(proxy.url("/unicorns/7"))
        .body("not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_missing_engine_source_fails_closed() {
    let backend = start_stub_backend(200, r#"{"name":"Sparkle"}"#).await;
    let dir = code_dir();
    fs::remove_file(dir.path().join("src/fingerprint/engine.rs")).unwrap();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client().get(proxy.url("/unicorns/42")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(SECRET_HEADER).is_none());

    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    assert!(backend.requests().is_empty());
}

#[tokio::test]
async fn test_tampered_glob_logic_changes_echoed_secret() {
    let backend = start_stub_backend(200, "{}").await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let before = client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    let before = before.headers().get(SECRET_HEADER).unwrap().clone();

    fs::write(
        dir.path().join("src/fingerprint/artifact.rs"),
        "// expansion that drops a description\n",
    )
    .unwrap();

    let after = client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    assert_ne!(after.headers().get(SECRET_HEADER).unwrap(), &before);
}

#[tokio::test]
async fn test_secret_failure_leaves_passthrough_routes_working() {
    let backend = start_stub_backend(200, "[]").await;
    let dir = code_dir();
    fs::remove_dir_all(dir.path().join("unicorn_descriptions")).unwrap();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = client().get(proxy.url("/unicorn")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = client().get(proxy.url("/healthcheck")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_secret_tracks_artifact_changes_without_restart() {
    let backend = start_stub_backend(200, "{}").await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let secret_of = |response: &reqwest::Response| {
        response
            .headers()
            .get(SECRET_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    };

    let first = client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    let second = client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    assert_eq!(secret_of(&first), secret_of(&second));

    fs::write(
        dir.path().join("unicorn_descriptions/sparkle.txt"),
        "Sparkle\nLoves pears.\n",
    )
    .unwrap();

    let third = client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    assert_ne!(secret_of(&first), secret_of(&third));
}

#[tokio::test]
async fn test_backend_error_status_is_relayed() {
    let backend = start_stub_backend(404, r#"{"error":"no such unicorn"}"#).await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client().get(proxy.url("/unicorns/999")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "no such unicorn" }));
}

#[tokio::test]
async fn test_feed_relays_backend_error_status() {
    let backend = start_stub_backend(422, r#"{"error":"unicorn is full"}"#).await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client()
        .post(proxy.url("/unicorns/7"))
        .json(&json!({ "snack": "apple", "teamid": "t1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body = response.text().await.unwrap();
    assert_eq!(body, r#"{"error":"unicorn is full"}"#);

    assert_eq!(backend.requests().len(), 1);
}

#[tokio::test]
async fn test_feed_with_unreachable_backend_is_bad_gateway() {
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), closed_backend()).unwrap()).await;

    let response = client()
        .post(proxy.url("/unicorns/7"))
        .json(&json!({ "snack": "apple", "teamid": "t1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "backend unreachable" }));
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), closed_backend()).unwrap()).await;

    let response = client().get(proxy.url("/unicorn")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let response = client().get(proxy.url("/unicorns/3")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(response.headers().get(SECRET_HEADER).is_none());
}

#[tokio::test]
async fn test_missing_content_type_defaults_to_json() {
    let backend = start_raw_backend("200 OK", r#"{"name":"Sparkle"}"#).await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend).unwrap()).await;

    let response = client().get(proxy.url("/unicorn")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "application/json"
    );
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let backend = start_stub_backend(200, "[]").await;
    let dir = code_dir();
    let proxy = spawn_proxy(HttpServer::new(config_for(&dir), backend.url()).unwrap()).await;

    let response = client()
        .get(proxy.url("/unicorn"))
        .header("x-request-id", "req-abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "req-abc-123");

    let requests = backend.requests();
    assert_eq!(requests[0].headers.get("x-request-id").unwrap(), "req-abc-123");
}

#[tokio::test]
async fn test_telemetry_records_secret_failures() {
    let backend = start_stub_backend(200, "{}").await;
    let dir = code_dir();
    fs::remove_file(dir.path().join("src/fingerprint/engine.rs")).unwrap();

    let telemetry = Arc::new(RecordingTelemetry::default());
    let server = HttpServer::new(config_for(&dir), backend.url())
        .unwrap()
        .with_telemetry(telemetry.clone());
    let proxy = spawn_proxy(server).await;

    client().get(proxy.url("/unicorns/1")).send().await.unwrap();
    client().get(proxy.url("/unicorn")).send().await.unwrap();

    let events = telemetry.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].route, "get_unicorn");
    assert!(events[0].secret_failed);
    assert!(!events[0].secret_attached);
    assert_eq!(events[0].status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!events[1].secret_failed);
    assert_eq!(events[1].status, StatusCode::OK);
}

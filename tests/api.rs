//! End-to-end tests of the `/configs` API over a real socket.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use common::{start_api, CountingStore, VALID_CONFIG};
use lbx::config::settings::ApiSettings;
use lbx::store::{ConfigStore, MemoryStore};
use lbx::workflow::ConfigService;
use lbx::HttpServer;
use lbx_sdk::ConfigClient;
use reqwest::StatusCode;
use tower::ServiceExt;

/// Send one request through the full middleware stack over a failing store.
async fn send_to_broken_store(method: &str, uri: &str, body: &str) -> (u16, String) {
    let service = ConfigService::new(Arc::new(CountingStore::failing()));
    let router = HttpServer::new(ApiSettings::default(), service).router();

    let request = Request::builder().method(method).uri(uri).body(Body::from(body.to_string())).unwrap();
    let response = router.oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_save_get_list_delete_roundtrip() {
    let store = MemoryStore::new();
    let (url, shutdown) = start_api(store.clone()).await;
    let client = ConfigClient::new(&url);

    assert!(client.list_configs().await.unwrap().is_empty());

    client.save_config("my-lb", VALID_CONFIG).await.unwrap();
    client.save_config("another-lb", VALID_CONFIG).await.unwrap();

    assert_eq!(client.list_configs().await.unwrap(), vec!["another-lb", "my-lb"]);
    assert_eq!(client.get_config("my-lb").await.unwrap().as_deref(), Some(VALID_CONFIG));
    assert_eq!(store.get("my-lb").await.unwrap(), VALID_CONFIG.as_bytes());

    client.delete_config("my-lb").await.unwrap();
    assert_eq!(client.get_config("my-lb").await.unwrap(), None);
    assert_eq!(client.list_configs().await.unwrap(), vec!["another-lb"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_second_save_is_rejected() {
    let (url, shutdown) = start_api(MemoryStore::new()).await;
    let client = ConfigClient::new(&url);

    client.save_config("my-lb", VALID_CONFIG).await.unwrap();
    let err = client.save_config("my-lb", VALID_CONFIG).await.unwrap_err();
    assert!(err.to_string().contains("config name my-lb already exists"), "{}", err);

    shutdown.trigger();
}

#[tokio::test]
async fn test_invalid_document_is_not_stored() {
    let store = MemoryStore::new();
    let (url, shutdown) = start_api(store.clone()).await;

    let resp = reqwest::Client::new()
        .post(format!("{}/configs", url))
        .query(&[("name", "broken")])
        .body("name: broken\nlisteners:\n  - name: ssh\n    protocol: ssh\n    port: 22\n")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = resp.text().await.unwrap();
    assert!(body.contains("error(s) parsing YAML"), "{}", body);
    assert!(body.contains(r#"listener 1: Invalid protocol "ssh""#), "{}", body);
    assert!(store.is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_status_codes() {
    let (url, shutdown) = start_api(MemoryStore::new()).await;
    let http = reqwest::Client::new();

    let resp = http.post(format!("{}/configs", url)).body(VALID_CONFIG).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = http.delete(format!("{}/configs", url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = http.get(format!("{}/configs/nope", url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = http
        .delete(format!("{}/configs", url))
        .query(&[("name", "nope")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(resp.text().await.unwrap(), "config name nope does not exist");

    shutdown.trigger();
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let (url, shutdown) = start_api(MemoryStore::new()).await;

    let resp = reqwest::Client::new()
        .get(format!("{}/configs", url))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "abc-123");

    let resp = reqwest::get(format!("{}/configs", url)).await.unwrap();
    assert!(resp.headers().contains_key("x-request-id"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_backend_failures_are_500() {
    let (status, body) = send_to_broken_store("GET", "/configs", "").await;
    assert_eq!(status, 500);
    assert_eq!(body, "error fetching all keys");

    let (status, body) = send_to_broken_store("GET", "/configs/my-lb", "").await;
    assert_eq!(status, 500);
    assert_eq!(body, "error fetching config");

    let (status, body) = send_to_broken_store("DELETE", "/configs?name=my-lb", "").await;
    assert_eq!(status, 500);
    assert_eq!(body, "delete failed");

    let (status, body) = send_to_broken_store("POST", "/configs?name=my-lb", VALID_CONFIG).await;
    assert_eq!(status, 500);
    assert!(body.starts_with("save failed:"), "{}", body);
    assert!(body.contains("connection refused"), "{}", body);
}

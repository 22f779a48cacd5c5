mod common;

use axum_test::TestServer;
use serde_json::Value;
use std::sync::Arc;

#[tokio::test]
async fn test_health_check_healthy() {
    let server = TestServer::new(common::test_app(common::create_test_state())).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_health_check_store_down() {
    let state = common::state_for(Arc::new(common::UnavailableStore));
    let server = TestServer::new(common::test_app(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["store"]["status"], "error");
}

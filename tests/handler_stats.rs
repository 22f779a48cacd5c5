mod common;

use axum_test::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn test_stats_new_mapping() {
    let server = TestServer::new(common::test_app(common::create_test_state())).unwrap();

    let created: Value = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json();
    let code = created["code"].as_str().unwrap();

    let response = server.get(&format!("/shorten/{code}/stats")).await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["code"], code);
    assert_eq!(body["destination"], "https://example.com");
    assert_eq!(body["access_count"], 1);
    assert_eq!(
        body["short_url"],
        format!("{}/{}", common::BASE_URL, code)
    );
}

#[tokio::test]
async fn test_stats_not_found() {
    let server = TestServer::new(common::test_app(common::create_test_state())).unwrap();

    let response = server.get("/shorten/missing/stats").await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_stats_after_update_keeps_count() {
    let server = TestServer::new(common::test_app(common::create_test_state())).unwrap();

    let created: Value = server
        .post("/shorten")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .json();
    let code = created["code"].as_str().unwrap();

    server.get(&format!("/{code}")).await;
    server
        .put(&format!("/shorten/{code}"))
        .json(&json!({ "url": "https://new.example.com" }))
        .await;

    let body: Value = server.get(&format!("/shorten/{code}/stats")).await.json();
    assert_eq!(body["destination"], "https://new.example.com");
    assert_eq!(body["access_count"], 2);
}

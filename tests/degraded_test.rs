//! Tests for degraded operation when the document store is unavailable

use std::sync::Arc;

use axum_test::TestServer;
use dlcms::store::UnavailableStore;
use dlcms::{routes, AppState, Config};
use serde_json::{json, Value};

fn degraded_server() -> TestServer {
    let store = Arc::new(UnavailableStore);
    let state = Arc::new(AppState::new(
        Config::default(),
        store.clone(),
        store.clone(),
        store,
    ));
    TestServer::new(routes::create_router(state)).expect("Failed to create test server")
}

#[tokio::test]
async fn test_service_stays_reachable_without_a_store() {
    let server = degraded_server();

    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_data_operations_fail_with_internal_error() {
    let server = degraded_server();

    let response = server.get("/api/courses").await;
    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["message"], "Internal server error.");
    assert!(body["error"].is_string());

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": "jane@example.com", "password": "password123" }))
        .await;
    assert_eq!(response.status_code(), 500);
}

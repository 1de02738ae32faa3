//! Common test utilities for integration tests

use std::sync::Arc;

use axum_test::TestServer;
use dlcms::{
    routes, AppState, Config, InMemoryCourseStore, InMemoryReviewStore, InMemoryUserStore,
};
use serde_json::{json, Value};

/// Shared secret configured for tests
pub const TEST_ADMIN_SECRET: &str = "test-admin-secret";

/// A test server over in-memory stores, with handles kept for direct
/// store-level setup
#[allow(dead_code)]
pub struct TestApp {
    pub server: TestServer,
    pub user_store: Arc<InMemoryUserStore>,
    pub course_store: Arc<InMemoryCourseStore>,
    pub review_store: Arc<InMemoryReviewStore>,
    pub config: Config,
    _upload_dir: tempfile::TempDir,
}

#[allow(dead_code)]
pub fn create_test_app() -> TestApp {
    create_test_app_with(|_| {})
}

#[allow(dead_code)]
pub fn create_test_app_with(adjust: impl FnOnce(&mut Config)) -> TestApp {
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");

    let mut config = Config {
        admin_secret: TEST_ADMIN_SECRET.to_string(),
        upload_dir: upload_dir.path().to_str().unwrap().to_string(),
        ..Config::default()
    };
    adjust(&mut config);

    let user_store = Arc::new(InMemoryUserStore::new());
    let course_store = Arc::new(InMemoryCourseStore::new());
    let review_store = Arc::new(InMemoryReviewStore::new());

    let state = Arc::new(AppState::new(
        config.clone(),
        course_store.clone(),
        user_store.clone(),
        review_store.clone(),
    ));
    let server = TestServer::new(routes::create_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        user_store,
        course_store,
        review_store,
        config,
        _upload_dir: upload_dir,
    }
}

/// Helper to create a course and return its JSON document
#[allow(dead_code)]
pub async fn create_course(server: &TestServer) -> Value {
    let response = server
        .post("/api/courses")
        .json(&json!({
            "title": "React Basics",
            "description": "Components, hooks, and state",
            "instructor": "John Doe",
            "category": "Programming",
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

/// Helper to add a lesson to a course and return its JSON document
#[allow(dead_code)]
pub async fn add_lesson(server: &TestServer, course_id: &str, title: &str) -> Value {
    let response = server
        .post(&format!("/api/courses/{course_id}/lessons"))
        .json(&json!({ "title": title }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

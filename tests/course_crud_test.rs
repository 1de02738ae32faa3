//! Tests for course CRUD over the HTTP surface

mod common;

use common::{create_course, create_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_health() {
    let app = create_test_app();

    let response = app.server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_course_defaults() {
    let app = create_test_app();

    let course = create_course(&app.server).await;
    assert_eq!(course["isPublished"], true);
    assert_eq!(course["level"], "Beginner");
    assert_eq!(course["duration"], "N/A");
    assert_eq!(course["rating"], 0.0);
    assert_eq!(course["lessons"], json!([]));
    assert!(course["id"].is_string());
}

#[tokio::test]
async fn test_create_course_missing_fields_is_validation_error() {
    let app = create_test_app();

    let response = app
        .server
        .post("/api/courses")
        .json(&json!({ "title": "Half-filled" }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_published_listing_excludes_unpublished() {
    let app = create_test_app();

    let visible = create_course(&app.server).await;
    let hidden = create_course(&app.server).await;

    let response = app
        .server
        .patch(&format!("/api/courses/{}", hidden["id"].as_str().unwrap()))
        .json(&json!({ "isPublished": false }))
        .await;
    assert_eq!(response.status_code(), 200);

    let listed: Value = app.server.get("/api/courses").await.json();
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], visible["id"]);

    let all: Value = app.server.get("/api/admin/courses").await.json();
    assert_eq!(all.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_get_by_id() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let id = course["id"].as_str().unwrap();

    let response = app.server.get(&format!("/api/admin/courses/{id}")).await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["title"], "React Basics");

    let response = app.server.get("/api/admin/courses/no-such-course").await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["message"], "Course not found.");
}

#[tokio::test]
async fn test_partial_update_merges_supplied_fields_only() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let id = course["id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/api/courses/{id}"))
        .json(&json!({ "duration": "6 weeks", "level": "Advanced" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["duration"], "6 weeks");
    assert_eq!(updated["level"], "Advanced");
    // untouched fields survive
    assert_eq!(updated["title"], "React Basics");
    assert_eq!(updated["instructor"], "John Doe");
}

#[tokio::test]
async fn test_update_missing_course_is_not_found() {
    let app = create_test_app();

    let response = app
        .server
        .patch("/api/courses/no-such-course")
        .json(&json!({ "title": "x" }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_delete_course_cascades() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let id = course["id"].as_str().unwrap();

    let response = app.server.delete(&format!("/api/courses/{id}")).await;
    assert_eq!(response.status_code(), 200);

    let response = app.server.get(&format!("/api/admin/courses/{id}")).await;
    assert_eq!(response.status_code(), 404);

    let response = app.server.delete(&format!("/api/courses/{id}")).await;
    assert_eq!(response.status_code(), 404);
}

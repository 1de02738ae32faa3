//! Tests for lesson operations over the HTTP surface

mod common;

use common::{add_lesson, create_course, create_test_app};
use serde_json::{json, Value};

#[tokio::test]
async fn test_add_lesson_normalizes_video_fields() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let course_id = course["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/api/courses/{course_id}/lessons"))
        .json(&json!({ "title": "intro", "videoUrl": "https://youtu.be/xyz" }))
        .await;
    assert_eq!(response.status_code(), 201);
    let lesson: Value = response.json();
    assert_eq!(lesson["videoUrls"], json!(["https://youtu.be/xyz"]));
    assert_eq!(lesson["videoUrl"], "https://youtu.be/xyz");
    assert_eq!(lesson["order"], 0);
    assert_eq!(lesson["materials"], json!([]));
}

#[tokio::test]
async fn test_add_lesson_requires_title() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let course_id = course["id"].as_str().unwrap();

    let response = app
        .server
        .post(&format!("/api/courses/{course_id}/lessons"))
        .json(&json!({ "videoUrl": "https://youtu.be/xyz" }))
        .await;
    assert_eq!(response.status_code(), 400);

    let response = app
        .server
        .post("/api/courses/no-such-course/lessons")
        .json(&json!({ "title": "intro" }))
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_update_lesson_field_policies() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let course_id = course["id"].as_str().unwrap();
    let lesson = add_lesson(&app.server, course_id, "intro").await;
    let lesson_id = lesson["id"].as_str().unwrap();

    // empty-string title is "not supplied"; explicit order 0 applies
    let response = app
        .server
        .patch(&format!("/api/courses/{course_id}/lessons/{lesson_id}"))
        .json(&json!({ "title": "", "order": 0, "description": "covers setup" }))
        .await;
    assert_eq!(response.status_code(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["title"], "intro");
    assert_eq!(updated["order"], 0);
    assert_eq!(updated["description"], "covers setup");
}

#[tokio::test]
async fn test_update_lesson_video_urls_win_over_legacy() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let course_id = course["id"].as_str().unwrap();
    let lesson = add_lesson(&app.server, course_id, "intro").await;
    let lesson_id = lesson["id"].as_str().unwrap();

    let response = app
        .server
        .patch(&format!("/api/courses/{course_id}/lessons/{lesson_id}"))
        .json(&json!({
            "videoUrl": "https://youtu.be/legacy",
            "videoUrls": ["https://youtu.be/a", "https://youtu.be/b"],
        }))
        .await;
    assert_eq!(response.status_code(), 200);
    let updated: Value = response.json();
    assert_eq!(updated["videoUrl"], "https://youtu.be/a");
    assert_eq!(
        updated["videoUrls"],
        json!(["https://youtu.be/a", "https://youtu.be/b"])
    );
}

#[tokio::test]
async fn test_lesson_order_append_quirk_over_http() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let course_id = course["id"].as_str().unwrap();

    add_lesson(&app.server, course_id, "a").await;
    let b = add_lesson(&app.server, course_id, "b").await;
    let c = add_lesson(&app.server, course_id, "c").await;

    let response = app
        .server
        .delete(&format!(
            "/api/courses/{course_id}/lessons/{}",
            b["id"].as_str().unwrap()
        ))
        .await;
    assert_eq!(response.status_code(), 200);

    let d = add_lesson(&app.server, course_id, "d").await;
    assert_eq!(d["order"], c["order"]);
}

#[tokio::test]
async fn test_delete_missing_lesson_is_not_found() {
    let app = create_test_app();
    let course = create_course(&app.server).await;
    let course_id = course["id"].as_str().unwrap();

    let response = app
        .server
        .delete(&format!("/api/courses/{course_id}/lessons/no-such-lesson"))
        .await;
    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["message"], "Lesson not found.");
}

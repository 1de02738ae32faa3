//! Lesson sub-document endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::courses::{self, LessonInput};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{CourseId, CourseStore, Lesson, ReviewStore, UserStore};

/// POST /api/courses/:course_id/lessons
pub async fn add<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(course_id): Path<String>,
    Json(input): Json<LessonInput>,
) -> Result<(StatusCode, Json<Lesson>), ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let lesson = courses::add_lesson(state.course_store.as_ref(), &CourseId(course_id), input)?;
    Ok((StatusCode::CREATED, Json(lesson)))
}

/// PATCH /api/courses/:course_id/lessons/:lesson_id
pub async fn update<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path((course_id, lesson_id)): Path<(String, String)>,
    Json(patch): Json<LessonInput>,
) -> Result<Json<Lesson>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let lesson = courses::update_lesson(
        state.course_store.as_ref(),
        &CourseId(course_id),
        &lesson_id,
        patch,
    )?;
    Ok(Json(lesson))
}

/// DELETE /api/courses/:course_id/lessons/:lesson_id
pub async fn delete<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path((course_id, lesson_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    courses::delete_lesson(state.course_store.as_ref(), &CourseId(course_id), &lesson_id)?;
    Ok(Json(serde_json::json!({ "message": "Lesson deleted." })))
}

//! Course CRUD endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::courses::{self, CourseUpdate, NewCourse};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{Course, CourseId, CourseStore, ReviewStore, UserStore};

/// GET /api/courses
pub async fn list_published<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
) -> Result<Json<Vec<Course>>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    Ok(Json(state.course_store.list_published_courses()?))
}

/// GET /api/admin/courses
pub async fn list_all<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
) -> Result<Json<Vec<Course>>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    Ok(Json(state.course_store.list_courses()?))
}

/// GET /api/admin/courses/:id
pub async fn get_by_id<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(id): Path<String>,
) -> Result<Json<Course>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let course = courses::get_course(state.course_store.as_ref(), &CourseId(id))?;
    Ok(Json(course))
}

/// POST /api/courses
pub async fn create<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Json(input): Json<NewCourse>,
) -> Result<(StatusCode, Json<Course>), ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let course = courses::create_course(state.course_store.as_ref(), input)?;
    Ok((StatusCode::CREATED, Json(course)))
}

/// PATCH /api/courses/:id
pub async fn update<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(id): Path<String>,
    Json(patch): Json<CourseUpdate>,
) -> Result<Json<Course>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let course = courses::update_course(state.course_store.as_ref(), &CourseId(id), patch)?;
    Ok(Json(course))
}

/// DELETE /api/courses/:id
pub async fn delete<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    courses::delete_course(state.course_store.as_ref(), &CourseId(id))?;
    Ok(Json(serde_json::json!({ "message": "Course deleted." })))
}

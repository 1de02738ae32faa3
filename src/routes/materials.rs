//! Material sub-document endpoints

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::courses::{self, MaterialInput};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{CourseId, CourseStore, Material, ReviewStore, UserStore};

/// POST /api/courses/:course_id/lessons/:lesson_id/materials
pub async fn add<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path((course_id, lesson_id)): Path<(String, String)>,
    Json(input): Json<MaterialInput>,
) -> Result<(StatusCode, Json<Material>), ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let material = courses::add_material(
        state.course_store.as_ref(),
        &CourseId(course_id),
        &lesson_id,
        input,
    )?;
    Ok((StatusCode::CREATED, Json(material)))
}

/// PATCH /api/courses/:course_id/lessons/:lesson_id/materials/:material_id
pub async fn update<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path((course_id, lesson_id, material_id)): Path<(String, String, String)>,
    Json(patch): Json<MaterialInput>,
) -> Result<Json<Material>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let material = courses::update_material(
        state.course_store.as_ref(),
        &CourseId(course_id),
        &lesson_id,
        &material_id,
        patch,
    )?;
    Ok(Json(material))
}

/// DELETE /api/courses/:course_id/lessons/:lesson_id/materials/:material_id
pub async fn delete<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path((course_id, lesson_id, material_id)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    courses::delete_material(
        state.course_store.as_ref(),
        &CourseId(course_id),
        &lesson_id,
        &material_id,
    )?;
    Ok(Json(serde_json::json!({ "message": "Material deleted." })))
}

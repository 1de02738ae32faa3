//! Authentication endpoints

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::account::{self, LoginInput, RegisterInput};
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{CourseStore, ReviewStore, UserStore};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub role: String,
    pub name: String,
    pub user_id: u64,
}

/// POST /api/auth/login
pub async fn login<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Json(input): Json<LoginInput>,
) -> Result<Json<AuthResponse>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let user = account::login(state.user_store.as_ref(), input)?;

    Ok(Json(AuthResponse {
        message: "Login successful".to_string(),
        role: user.role.as_str().to_string(),
        name: user.name,
        user_id: user.id.0,
    }))
}

/// POST /api/auth/register
pub async fn register<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let user = account::register(state.user_store.as_ref(), &state.config.admin_secret, input)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "Account created".to_string(),
            role: user.role.as_str().to_string(),
            name: user.name,
            user_id: user.id.0,
        }),
    ))
}

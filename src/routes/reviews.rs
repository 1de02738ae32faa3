//! Review endpoints
//!
//! Review comments are private: the public listings serialize only the
//! numeric rating, and the full records are gated behind the shared admin
//! secret.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{fresh_id, CourseId, CourseStore, Review, ReviewStore, UserId, UserStore};

/// Header carrying the shared admin secret
const ADMIN_SECRET_HEADER: &str = "x-admin-secret";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub user_id: Option<u64>,
    pub rating: Option<u8>,
    pub comment: Option<String>,
}

/// Review shape exposed to non-admin callers: no comment
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicReview {
    pub id: String,
    pub course_id: CourseId,
    pub user_id: UserId,
    pub rating: u8,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for PublicReview {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            course_id: review.course_id,
            user_id: review.user_id,
            rating: review.rating,
            created_at: review.created_at,
        }
    }
}

fn require_admin_secret(headers: &HeaderMap, config: &Config) -> Result<(), ApiError> {
    let provided = headers
        .get(ADMIN_SECRET_HEADER)
        .and_then(|value| value.to_str().ok());
    if provided != Some(config.admin_secret.as_str()) {
        return Err(ApiError::Unauthorized("Admin access required.".to_string()));
    }
    Ok(())
}

/// POST /api/courses/:course_id/reviews
pub async fn submit<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(course_id): Path<String>,
    Json(input): Json<ReviewInput>,
) -> Result<(StatusCode, Json<PublicReview>), ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let (rating, comment) = match (input.rating, input.comment) {
        (Some(rating), Some(comment)) if !comment.is_empty() => (rating, comment),
        _ => {
            return Err(ApiError::Validation(
                "Rating and comment required.".to_string(),
            ))
        }
    };
    if !(1..=5).contains(&rating) {
        return Err(ApiError::Validation(
            "Rating must be an integer between 1 and 5.".to_string(),
        ));
    }
    let user_id = input
        .user_id
        .ok_or_else(|| ApiError::Validation("userId required.".to_string()))?;

    // No per-user uniqueness: resubmitting adds another review
    let review = state.review_store.insert_review(Review {
        id: fresh_id(),
        course_id: CourseId(course_id),
        user_id: UserId(user_id),
        rating,
        comment,
        created_at: Utc::now(),
    })?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// GET /api/courses/:course_id/reviews
pub async fn list_for_course<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(course_id): Path<String>,
) -> Result<Json<Vec<PublicReview>>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let reviews = state
        .review_store
        .list_reviews_for_course(&CourseId(course_id))?;
    Ok(Json(reviews.into_iter().map(PublicReview::from).collect()))
}

/// GET /api/users/:user_id/reviews
pub async fn list_for_user<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(user_id): Path<u64>,
) -> Result<Json<Vec<PublicReview>>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let reviews = state.review_store.list_reviews_for_user(UserId(user_id))?;
    Ok(Json(reviews.into_iter().map(PublicReview::from).collect()))
}

/// GET /api/admin/courses/:course_id/reviews
pub async fn admin_list_for_course<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(course_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Vec<Review>>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    require_admin_secret(&headers, &state.config)?;

    let reviews = state
        .review_store
        .list_reviews_for_course(&CourseId(course_id))?;
    Ok(Json(reviews))
}

/// DELETE /api/admin/reviews/:review_id
pub async fn delete<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    Path(review_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    require_admin_secret(&headers, &state.config)?;

    if !state.review_store.delete_review(&review_id)? {
        return Err(ApiError::NotFound("Review"));
    }
    Ok(Json(serde_json::json!({ "message": "Review deleted." })))
}

//! HTTP routes for the service

mod auth;
mod courses;
mod health;
mod lessons;
mod materials;
mod reviews;
mod uploads;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::store::{CourseStore, ReviewStore, UserStore};

/// Create the router with all routes
pub fn create_router<C, U, R>(state: Arc<AppState<C, U, R>>) -> Router
where
    C: CourseStore + 'static,
    U: UserStore + 'static,
    R: ReviewStore + 'static,
{
    let upload_dir = state.config.upload_dir.clone();

    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register))
        .route("/api/courses", get(courses::list_published).post(courses::create))
        .route("/api/admin/courses", get(courses::list_all))
        .route("/api/admin/courses/:course_id", get(courses::get_by_id))
        .route(
            "/api/courses/:course_id",
            patch(courses::update).delete(courses::delete),
        )
        .route("/api/courses/:course_id/lessons", post(lessons::add))
        .route(
            "/api/courses/:course_id/lessons/:lesson_id",
            patch(lessons::update).delete(lessons::delete),
        )
        .route(
            "/api/courses/:course_id/lessons/:lesson_id/materials",
            post(materials::add),
        )
        .route(
            "/api/courses/:course_id/lessons/:lesson_id/materials/:material_id",
            patch(materials::update).delete(materials::delete),
        )
        .route(
            "/api/courses/:course_id/reviews",
            post(reviews::submit).get(reviews::list_for_course),
        )
        .route("/api/users/:user_id/reviews", get(reviews::list_for_user))
        .route(
            "/api/admin/courses/:course_id/reviews",
            get(reviews::admin_list_for_course),
        )
        .route("/api/admin/reviews/:review_id", delete(reviews::delete))
        // the handler enforces the configured ceiling itself so the
        // response can name the limit
        .route(
            "/api/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::disable()),
        )
        // Serve uploaded assets
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

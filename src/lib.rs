//! dlcms — Digital Learning Content Management Service
//!
//! A REST API for administrator-authored courses (with nested lessons and
//! materials), learner accounts, private course reviews, and binary asset
//! uploads, backed by a document-oriented store.

pub mod account;
pub mod config;
pub mod courses;
pub mod crypto;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;

pub use account::{ensure_admin_account, ADMIN_EMAIL};
pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
pub use store::{
    CourseStore, InMemoryCourseStore, InMemoryReviewStore, InMemoryUserStore, ReviewStore,
    SqliteStore, UserStore,
};

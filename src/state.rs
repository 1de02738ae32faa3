//! Application state shared across request handlers

use std::sync::Arc;

use crate::config::Config;
use crate::store::{CourseStore, ReviewStore, UserStore};

/// Application state, generic over the storage backends so tests can run
/// against in-memory stores. A single backend (e.g. `SqliteStore`) may serve
/// as all three.
pub struct AppState<C, U, R> {
    pub config: Config,
    pub course_store: Arc<C>,
    pub user_store: Arc<U>,
    pub review_store: Arc<R>,
}

impl<C, U, R> AppState<C, U, R>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    pub fn new(
        config: Config,
        course_store: Arc<C>,
        user_store: Arc<U>,
        review_store: Arc<R>,
    ) -> Self {
        Self {
            config,
            course_store,
            user_store,
            review_store,
        }
    }
}

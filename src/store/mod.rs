//! Storage abstractions for the service

pub mod memory;
pub mod models;
pub mod sqlite;

pub use memory::{InMemoryCourseStore, InMemoryReviewStore, InMemoryUserStore};
pub use models::*;
pub use sqlite::SqliteStore;

use crate::error::ApiError;

/// Result type for store operations
pub type StoreResult<T> = Result<T, ApiError>;

/// Trait for user account storage
pub trait UserStore: Send + Sync {
    /// Create a user; the store assigns the id and timestamps. Fails with
    /// `Conflict` if the email is already registered.
    fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// Look up a user by (case-insensitive) email
    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Overwrite an existing user record
    fn update_user(&self, user: &User) -> StoreResult<()>;
}

/// Trait for course aggregate storage. Aggregates are read and written as
/// whole documents; concurrent writers are last-write-wins.
pub trait CourseStore: Send + Sync {
    /// Persist a new course aggregate
    fn insert_course(&self, course: Course) -> StoreResult<Course>;

    /// Load a course aggregate by id
    fn get_course(&self, id: &CourseId) -> StoreResult<Option<Course>>;

    /// Overwrite the whole stored document with this aggregate
    fn save_course(&self, course: &Course) -> StoreResult<()>;

    /// Remove a course aggregate; returns whether it existed
    fn delete_course(&self, id: &CourseId) -> StoreResult<bool>;

    /// All courses, newest-first by creation time
    fn list_courses(&self) -> StoreResult<Vec<Course>>;

    /// Published courses only, newest-first by creation time
    fn list_published_courses(&self) -> StoreResult<Vec<Course>>;
}

/// Trait for review storage
pub trait ReviewStore: Send + Sync {
    fn insert_review(&self, review: Review) -> StoreResult<Review>;

    fn list_reviews_for_course(&self, course_id: &CourseId) -> StoreResult<Vec<Review>>;

    fn list_reviews_for_user(&self, user_id: UserId) -> StoreResult<Vec<Review>>;

    /// Remove a review; returns whether it existed
    fn delete_review(&self, id: &str) -> StoreResult<bool>;
}

/// Store installed when the database could not be opened at startup: the
/// process stays reachable and every data operation fails with an internal
/// error.
pub struct UnavailableStore;

impl UnavailableStore {
    fn unavailable<T>(&self) -> StoreResult<T> {
        Err(ApiError::Internal("document store unavailable".to_string()))
    }
}

impl UserStore for UnavailableStore {
    fn create_user(&self, _user: NewUser) -> StoreResult<User> {
        self.unavailable()
    }

    fn get_user_by_email(&self, _email: &str) -> StoreResult<Option<User>> {
        self.unavailable()
    }

    fn update_user(&self, _user: &User) -> StoreResult<()> {
        self.unavailable()
    }
}

impl CourseStore for UnavailableStore {
    fn insert_course(&self, _course: Course) -> StoreResult<Course> {
        self.unavailable()
    }

    fn get_course(&self, _id: &CourseId) -> StoreResult<Option<Course>> {
        self.unavailable()
    }

    fn save_course(&self, _course: &Course) -> StoreResult<()> {
        self.unavailable()
    }

    fn delete_course(&self, _id: &CourseId) -> StoreResult<bool> {
        self.unavailable()
    }

    fn list_courses(&self) -> StoreResult<Vec<Course>> {
        self.unavailable()
    }

    fn list_published_courses(&self) -> StoreResult<Vec<Course>> {
        self.unavailable()
    }
}

impl ReviewStore for UnavailableStore {
    fn insert_review(&self, _review: Review) -> StoreResult<Review> {
        self.unavailable()
    }

    fn list_reviews_for_course(&self, _course_id: &CourseId) -> StoreResult<Vec<Review>> {
        self.unavailable()
    }

    fn list_reviews_for_user(&self, _user_id: UserId) -> StoreResult<Vec<Review>> {
        self.unavailable()
    }

    fn delete_review(&self, _id: &str) -> StoreResult<bool> {
        self.unavailable()
    }
}

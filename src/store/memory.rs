//! In-memory storage implementations

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use chrono::Utc;

use super::{
    Course, CourseId, CourseStore, NewUser, Review, ReviewStore, StoreResult, User, UserId,
    UserStore,
};
use crate::error::ApiError;

/// In-memory user store
pub struct InMemoryUserStore {
    users: RwLock<HashMap<u64, User>>,
    next_user_id: AtomicU64,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_user_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUserStore {
    fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let normalized = user.email.to_lowercase();
        let mut users = self.users.write().unwrap();
        if users.values().any(|u| u.email == normalized) {
            return Err(ApiError::Conflict("Account already exists.".to_string()));
        }

        let id = UserId(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        let now = Utc::now();
        let record = User {
            id,
            name: user.name,
            email: normalized,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        users.insert(id.0, record.clone());
        Ok(record)
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let normalized = email.to_lowercase();
        let users = self.users.read().unwrap();
        Ok(users.values().find(|u| u.email == normalized).cloned())
    }

    fn update_user(&self, user: &User) -> StoreResult<()> {
        let mut users = self.users.write().unwrap();
        if !users.contains_key(&user.id.0) {
            return Err(ApiError::NotFound("User"));
        }
        users.insert(user.id.0, user.clone());
        Ok(())
    }
}

/// In-memory course aggregate store
pub struct InMemoryCourseStore {
    courses: RwLock<HashMap<String, Course>>,
}

impl InMemoryCourseStore {
    pub fn new() -> Self {
        Self {
            courses: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryCourseStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CourseStore for InMemoryCourseStore {
    fn insert_course(&self, course: Course) -> StoreResult<Course> {
        self.courses
            .write()
            .unwrap()
            .insert(course.id.0.clone(), course.clone());
        Ok(course)
    }

    fn get_course(&self, id: &CourseId) -> StoreResult<Option<Course>> {
        Ok(self.courses.read().unwrap().get(&id.0).cloned())
    }

    fn save_course(&self, course: &Course) -> StoreResult<()> {
        self.courses
            .write()
            .unwrap()
            .insert(course.id.0.clone(), course.clone());
        Ok(())
    }

    fn delete_course(&self, id: &CourseId) -> StoreResult<bool> {
        Ok(self.courses.write().unwrap().remove(&id.0).is_some())
    }

    fn list_courses(&self) -> StoreResult<Vec<Course>> {
        let mut courses: Vec<Course> = self.courses.read().unwrap().values().cloned().collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    fn list_published_courses(&self) -> StoreResult<Vec<Course>> {
        let mut courses: Vec<Course> = self
            .courses
            .read()
            .unwrap()
            .values()
            .filter(|c| c.is_published)
            .cloned()
            .collect();
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }
}

/// In-memory review store
pub struct InMemoryReviewStore {
    reviews: RwLock<HashMap<String, Review>>,
}

impl InMemoryReviewStore {
    pub fn new() -> Self {
        Self {
            reviews: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewStore for InMemoryReviewStore {
    fn insert_review(&self, review: Review) -> StoreResult<Review> {
        self.reviews
            .write()
            .unwrap()
            .insert(review.id.clone(), review.clone());
        Ok(review)
    }

    fn list_reviews_for_course(&self, course_id: &CourseId) -> StoreResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .unwrap()
            .values()
            .filter(|r| r.course_id == *course_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    fn list_reviews_for_user(&self, user_id: UserId) -> StoreResult<Vec<Review>> {
        let mut reviews: Vec<Review> = self
            .reviews
            .read()
            .unwrap()
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }

    fn delete_review(&self, id: &str) -> StoreResult<bool> {
        Ok(self.reviews.write().unwrap().remove(id).is_some())
    }
}

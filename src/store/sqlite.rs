//! SQLite-backed document store
//!
//! Course aggregates are stored as one JSON document per row, read and
//! overwritten whole; users and reviews are plain rows.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use super::{
    Course, CourseId, CourseStore, NewUser, Review, ReviewStore, Role, StoreResult, User, UserId,
    UserStore,
};
use crate::error::ApiError;

/// Current schema version
const SCHEMA_VERSION: i32 = 1;

/// SQLite-based store implementing all three storage traits
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path
    pub fn open(path: &str) -> Result<Self, ApiError> {
        let conn = Connection::open(path).map_err(|e| ApiError::Internal(e.to_string()))?;

        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        Self::migrate(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run database migrations
    fn migrate(conn: &Connection) -> Result<(), ApiError> {
        let current_version = Self::get_schema_version(conn)?;

        if current_version < SCHEMA_VERSION {
            tracing::info!(
                current = current_version,
                target = SCHEMA_VERSION,
                "Running database migrations"
            );

            if current_version < 1 {
                Self::migrate_v1(conn)?;
            }

            conn.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

            tracing::info!("Database migrations complete");
        }

        Ok(())
    }

    /// Get current schema version (0 if no schema exists)
    fn get_schema_version(conn: &Connection) -> Result<i32, ApiError> {
        let table_exists: bool = conn
            .query_row(
                "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version')",
                [],
                |row| row.get(0),
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        if !table_exists {
            return Ok(0);
        }

        conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
            row.get::<_, Option<i32>>(0)
        })
        .map(|v| v.unwrap_or(0))
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn migrate_v1(conn: &Connection) -> Result<(), ApiError> {
        conn.execute_batch(
            "CREATE TABLE schema_version (
                version INTEGER NOT NULL PRIMARY KEY
            );

            CREATE TABLE users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE courses (
                id TEXT PRIMARY KEY,
                doc TEXT NOT NULL,
                is_published INTEGER NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE TABLE reviews (
                id TEXT PRIMARY KEY,
                course_id TEXT NOT NULL,
                user_id INTEGER NOT NULL,
                rating INTEGER NOT NULL,
                comment TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );

            CREATE INDEX idx_reviews_course ON reviews(course_id);
            CREATE INDEX idx_reviews_user ON reviews(user_id);",
        )
        .map_err(|e| ApiError::Internal(e.to_string()))
    }
}

fn timestamp(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let role: String = row.get(4)?;
    Ok(User {
        id: UserId(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
        password_hash: row.get(3)?,
        role: Role::from_str(&role).unwrap_or(Role::Learner),
        created_at: timestamp(row.get(5)?),
        updated_at: timestamp(row.get(6)?),
    })
}

impl UserStore for SqliteStore {
    fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let conn = self.conn.lock().unwrap();
        let normalized = user.email.to_lowercase();
        let now = Utc::now();

        let result = conn.execute(
            "INSERT INTO users (name, email, password_hash, role, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.name,
                normalized,
                user.password_hash,
                user.role.as_str(),
                now.timestamp_millis(),
                now.timestamp_millis(),
            ],
        );

        match result {
            Ok(_) => Ok(User {
                id: UserId(conn.last_insert_rowid() as u64),
                name: user.name,
                email: normalized,
                password_hash: user.password_hash,
                role: user.role,
                created_at: now,
                updated_at: now,
            }),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Err(ApiError::Conflict("Account already exists.".to_string()))
            }
            Err(e) => Err(ApiError::Internal(e.to_string())),
        }
    }

    fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT id, name, email, password_hash, role, created_at, updated_at
             FROM users WHERE email = ?1",
            params![email.to_lowercase()],
            user_from_row,
        )
        .optional()
        .map_err(|e| ApiError::Internal(e.to_string()))
    }

    fn update_user(&self, user: &User) -> StoreResult<()> {
        let conn = self.conn.lock().unwrap();
        let updated = conn
            .execute(
                "UPDATE users SET name = ?1, email = ?2, password_hash = ?3, role = ?4,
                 updated_at = ?5 WHERE id = ?6",
                params![
                    user.name,
                    user.email,
                    user.password_hash,
                    user.role.as_str(),
                    Utc::now().timestamp_millis(),
                    user.id.0,
                ],
            )
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        if updated == 0 {
            return Err(ApiError::NotFound("User"));
        }
        Ok(())
    }
}

impl CourseStore for SqliteStore {
    fn insert_course(&self, course: Course) -> StoreResult<Course> {
        let doc = serde_json::to_string(&course).map_err(|e| ApiError::Internal(e.to_string()))?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO courses (id, doc, is_published, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                course.id.as_str(),
                doc,
                course.is_published,
                course.created_at.timestamp_millis(),
            ],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(course)
    }

    fn get_course(&self, id: &CourseId) -> StoreResult<Option<Course>> {
        let conn = self.conn.lock().unwrap();
        let doc: Option<String> = conn
            .query_row(
                "SELECT doc FROM courses WHERE id = ?1",
                params![id.as_str()],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        match doc {
            Some(doc) => serde_json::from_str(&doc)
                .map(Some)
                .map_err(|e| ApiError::Internal(e.to_string())),
            None => Ok(None),
        }
    }

    fn save_course(&self, course: &Course) -> StoreResult<()> {
        let doc = serde_json::to_string(course).map_err(|e| ApiError::Internal(e.to_string()))?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR REPLACE INTO courses (id, doc, is_published, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                course.id.as_str(),
                doc,
                course.is_published,
                course.created_at.timestamp_millis(),
            ],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(())
    }

    fn delete_course(&self, id: &CourseId) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM courses WHERE id = ?1", params![id.as_str()])
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(deleted > 0)
    }

    fn list_courses(&self) -> StoreResult<Vec<Course>> {
        self.list_with_filter("SELECT doc FROM courses ORDER BY created_at DESC")
    }

    fn list_published_courses(&self) -> StoreResult<Vec<Course>> {
        self.list_with_filter(
            "SELECT doc FROM courses WHERE is_published = 1 ORDER BY created_at DESC",
        )
    }
}

impl SqliteStore {
    fn list_with_filter(&self, sql: &str) -> StoreResult<Vec<Course>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let mut courses = Vec::new();
        for doc in rows {
            let doc = doc.map_err(|e| ApiError::Internal(e.to_string()))?;
            let course =
                serde_json::from_str(&doc).map_err(|e| ApiError::Internal(e.to_string()))?;
            courses.push(course);
        }
        Ok(courses)
    }

    fn list_reviews<P: rusqlite::Params>(&self, sql: &str, params: P) -> StoreResult<Vec<Review>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        let rows = stmt
            .query_map(params, review_from_row)
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        let mut reviews = Vec::new();
        for review in rows {
            reviews.push(review.map_err(|e| ApiError::Internal(e.to_string()))?);
        }
        Ok(reviews)
    }
}

fn review_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Review> {
    Ok(Review {
        id: row.get(0)?,
        course_id: CourseId(row.get(1)?),
        user_id: UserId(row.get(2)?),
        rating: row.get(3)?,
        comment: row.get(4)?,
        created_at: timestamp(row.get(5)?),
    })
}

impl ReviewStore for SqliteStore {
    fn insert_review(&self, review: Review) -> StoreResult<Review> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO reviews (id, course_id, user_id, rating, comment, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                review.id,
                review.course_id.as_str(),
                review.user_id.0,
                review.rating,
                review.comment,
                review.created_at.timestamp_millis(),
            ],
        )
        .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(review)
    }

    fn list_reviews_for_course(&self, course_id: &CourseId) -> StoreResult<Vec<Review>> {
        self.list_reviews(
            "SELECT id, course_id, user_id, rating, comment, created_at
             FROM reviews WHERE course_id = ?1 ORDER BY created_at DESC",
            params![course_id.as_str()],
        )
    }

    fn list_reviews_for_user(&self, user_id: UserId) -> StoreResult<Vec<Review>> {
        self.list_reviews(
            "SELECT id, course_id, user_id, rating, comment, created_at
             FROM reviews WHERE user_id = ?1 ORDER BY created_at DESC",
            params![user_id.0],
        )
    }

    fn delete_review(&self, id: &str) -> StoreResult<bool> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute("DELETE FROM reviews WHERE id = ?1", params![id])
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{fresh_id, Lesson, Material, MaterialType};

    fn sample_course() -> Course {
        let now = Utc::now();
        Course {
            id: CourseId::new(),
            title: "React Basics".to_string(),
            description: "Learn React".to_string(),
            instructor: "John Doe".to_string(),
            category: "Programming".to_string(),
            level: Default::default(),
            duration: "N/A".to_string(),
            rating: 0.0,
            reviews: 0,
            students: 0,
            is_new_course: false,
            thumbnail: None,
            is_published: true,
            lessons: vec![Lesson {
                id: fresh_id(),
                title: "Intro".to_string(),
                video_url: Some("https://youtu.be/xyz".to_string()),
                video_urls: vec!["https://youtu.be/xyz".to_string()],
                description: None,
                order: 0,
                materials: vec![Material {
                    id: fresh_id(),
                    name: "Slides".to_string(),
                    url: "/uploads/slides.pdf".to_string(),
                    kind: MaterialType::Pdf,
                }],
            }],
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_course_aggregate_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();

        let course = store.insert_course(sample_course()).unwrap();
        let loaded = store.get_course(&course.id).unwrap().unwrap();
        assert_eq!(loaded, course);
        assert_eq!(loaded.lessons[0].materials[0].name, "Slides");
    }

    #[test]
    fn test_course_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");

        let course = {
            let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
            store.insert_course(sample_course()).unwrap()
        };

        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();
        let loaded = store.get_course(&course.id).unwrap().unwrap();
        assert_eq!(loaded.title, "React Basics");
    }

    #[test]
    fn test_published_filter() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();

        let mut hidden = sample_course();
        hidden.is_published = false;
        store.insert_course(sample_course()).unwrap();
        store.insert_course(hidden).unwrap();

        assert_eq!(store.list_courses().unwrap().len(), 2);
        assert_eq!(store.list_published_courses().unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_email_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.db");
        let store = SqliteStore::open(path.to_str().unwrap()).unwrap();

        let user = NewUser {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            password_hash: "hash".to_string(),
            role: Role::Learner,
        };
        store.create_user(user.clone()).unwrap();
        let err = store.create_user(user).unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}

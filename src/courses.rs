//! Course aggregate service
//!
//! Every mutating operation here follows the same cycle: load the whole
//! Course document by id, mutate the in-memory structure, persist the whole
//! document back. Concurrent writers to the same course are last-write-wins
//! at document granularity.

use chrono::Utc;
use serde::Deserialize;

use crate::error::ApiError;
use crate::store::{
    fresh_id, Course, CourseId, CourseStore, Lesson, Level, Material, MaterialType, UserId,
};

/// Canonical sub-document id comparison: normalize both sides to trimmed
/// string form before comparing. All lesson and material lookups go through
/// this helper.
fn ids_match(a: &str, b: &str) -> bool {
    a.trim() == b.trim()
}

fn required(field: Option<String>, message: &str) -> Result<String, ApiError> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ApiError::Validation(message.to_string())),
    }
}

/// Resolve the lesson video fields: an explicit non-empty `videoUrls` wins;
/// a lone legacy `videoUrl` is normalized into a one-element list; the
/// legacy field always mirrors the first entry.
fn normalized_video_fields(
    video_urls: Option<Vec<String>>,
    video_url: Option<String>,
) -> (Vec<String>, Option<String>) {
    match video_urls {
        Some(urls) if !urls.is_empty() => {
            let first = urls.first().cloned();
            (urls, first)
        }
        _ => match video_url {
            Some(url) if !url.is_empty() => (vec![url.clone()], Some(url)),
            _ => (Vec::new(), None),
        },
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub category: Option<String>,
    pub level: Option<Level>,
    pub duration: Option<String>,
    pub thumbnail: Option<String>,
    pub is_new_course: Option<bool>,
    /// Entries already in Lesson shape; stored verbatim, no normalization
    pub lessons: Option<Vec<Lesson>>,
    pub created_by: Option<UserId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructor: Option<String>,
    pub category: Option<String>,
    pub level: Option<Level>,
    pub duration: Option<String>,
    pub rating: Option<f64>,
    pub reviews: Option<u32>,
    pub students: Option<u32>,
    pub is_new_course: Option<bool>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
    pub lessons: Option<Vec<Lesson>>,
}

/// Lesson fields as supplied by clients, for both add and update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonInput {
    pub title: Option<String>,
    pub video_url: Option<String>,
    pub video_urls: Option<Vec<String>>,
    pub description: Option<String>,
    pub order: Option<i64>,
}

/// Material fields as supplied by clients, for both add and update
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialInput {
    pub name: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<MaterialType>,
}

pub fn create_course<C: CourseStore>(store: &C, input: NewCourse) -> Result<Course, ApiError> {
    const MESSAGE: &str = "Title, description, instructor, and category are required.";
    let title = required(input.title, MESSAGE)?;
    let description = required(input.description, MESSAGE)?;
    let instructor = required(input.instructor, MESSAGE)?;
    let category = required(input.category, MESSAGE)?;

    let now = Utc::now();
    let course = Course {
        id: CourseId::new(),
        title,
        description,
        instructor,
        category,
        level: input.level.unwrap_or_default(),
        duration: input.duration.unwrap_or_else(|| "N/A".to_string()),
        rating: 0.0,
        reviews: 0,
        students: 0,
        is_new_course: input.is_new_course.unwrap_or(false),
        thumbnail: input.thumbnail,
        // admin-authored creation publishes immediately
        is_published: true,
        lessons: input.lessons.unwrap_or_default(),
        created_by: input.created_by,
        created_at: now,
        updated_at: now,
    };

    store.insert_course(course)
}

pub fn get_course<C: CourseStore>(store: &C, id: &CourseId) -> Result<Course, ApiError> {
    store.get_course(id)?.ok_or(ApiError::NotFound("Course"))
}

/// Merge supplied fields into the stored document. Every field is
/// apply-if-defined: no validation is re-applied, and emptying a field that
/// was required at creation is allowed.
pub fn update_course<C: CourseStore>(
    store: &C,
    id: &CourseId,
    patch: CourseUpdate,
) -> Result<Course, ApiError> {
    let mut course = get_course(store, id)?;

    if let Some(title) = patch.title {
        course.title = title;
    }
    if let Some(description) = patch.description {
        course.description = description;
    }
    if let Some(instructor) = patch.instructor {
        course.instructor = instructor;
    }
    if let Some(category) = patch.category {
        course.category = category;
    }
    if let Some(level) = patch.level {
        course.level = level;
    }
    if let Some(duration) = patch.duration {
        course.duration = duration;
    }
    if let Some(rating) = patch.rating {
        course.rating = rating;
    }
    if let Some(reviews) = patch.reviews {
        course.reviews = reviews;
    }
    if let Some(students) = patch.students {
        course.students = students;
    }
    if let Some(is_new_course) = patch.is_new_course {
        course.is_new_course = is_new_course;
    }
    if let Some(thumbnail) = patch.thumbnail {
        course.thumbnail = Some(thumbnail);
    }
    if let Some(is_published) = patch.is_published {
        course.is_published = is_published;
    }
    if let Some(lessons) = patch.lessons {
        course.lessons = lessons;
    }

    course.updated_at = Utc::now();
    store.save_course(&course)?;
    Ok(course)
}

pub fn delete_course<C: CourseStore>(store: &C, id: &CourseId) -> Result<(), ApiError> {
    if !store.delete_course(id)? {
        return Err(ApiError::NotFound("Course"));
    }
    Ok(())
}

pub fn add_lesson<C: CourseStore>(
    store: &C,
    course_id: &CourseId,
    input: LessonInput,
) -> Result<Lesson, ApiError> {
    let mut course = get_course(store, course_id)?;

    let title = required(input.title, "Lesson title is required.")?;
    let (video_urls, video_url) = normalized_video_fields(input.video_urls, input.video_url);

    let lesson = Lesson {
        id: fresh_id(),
        title,
        video_url,
        video_urls,
        description: input.description,
        // append-to-end position, not max+1: deleting and re-adding lessons
        // can produce duplicate order values
        order: input.order.unwrap_or(course.lessons.len() as i64),
        materials: Vec::new(),
    };

    course.lessons.push(lesson.clone());
    course.updated_at = Utc::now();
    store.save_course(&course)?;
    Ok(lesson)
}

/// Per-field update policy: title, videoUrl, and description are
/// ignore-if-empty; videoUrls is apply-if-defined and wins over videoUrl;
/// order is apply-if-defined so an explicit 0 sticks.
fn apply_lesson_update(lesson: &mut Lesson, patch: LessonInput) {
    if let Some(title) = patch.title {
        if !title.is_empty() {
            lesson.title = title;
        }
    }
    if let Some(urls) = patch.video_urls {
        lesson.video_url = urls.first().cloned();
        lesson.video_urls = urls;
    } else if let Some(url) = patch.video_url {
        if !url.is_empty() {
            lesson.video_urls = vec![url.clone()];
            lesson.video_url = Some(url);
        }
    }
    if let Some(description) = patch.description {
        if !description.is_empty() {
            lesson.description = Some(description);
        }
    }
    if let Some(order) = patch.order {
        lesson.order = order;
    }
}

pub fn update_lesson<C: CourseStore>(
    store: &C,
    course_id: &CourseId,
    lesson_id: &str,
    patch: LessonInput,
) -> Result<Lesson, ApiError> {
    let mut course = get_course(store, course_id)?;
    let index = find_lesson(&course, lesson_id)?;

    apply_lesson_update(&mut course.lessons[index], patch);
    let updated = course.lessons[index].clone();

    course.updated_at = Utc::now();
    store.save_course(&course)?;
    Ok(updated)
}

pub fn delete_lesson<C: CourseStore>(
    store: &C,
    course_id: &CourseId,
    lesson_id: &str,
) -> Result<(), ApiError> {
    let mut course = get_course(store, course_id)?;
    let index = find_lesson(&course, lesson_id)?;

    course.lessons.remove(index);
    course.updated_at = Utc::now();
    store.save_course(&course)
}

pub fn add_material<C: CourseStore>(
    store: &C,
    course_id: &CourseId,
    lesson_id: &str,
    input: MaterialInput,
) -> Result<Material, ApiError> {
    let mut course = get_course(store, course_id)?;
    let index = find_lesson(&course, lesson_id)?;

    const MESSAGE: &str = "Material name and url are required.";
    let name = required(input.name, MESSAGE)?;
    let url = required(input.url, MESSAGE)?;

    let material = Material {
        id: fresh_id(),
        name,
        url,
        kind: input.kind.unwrap_or(MaterialType::Other),
    };

    course.lessons[index].materials.push(material.clone());
    course.updated_at = Utc::now();
    store.save_course(&course)?;
    Ok(material)
}

/// name and url are ignore-if-empty; type is apply-if-defined
fn apply_material_update(material: &mut Material, patch: MaterialInput) {
    if let Some(name) = patch.name {
        if !name.is_empty() {
            material.name = name;
        }
    }
    if let Some(url) = patch.url {
        if !url.is_empty() {
            material.url = url;
        }
    }
    if let Some(kind) = patch.kind {
        material.kind = kind;
    }
}

pub fn update_material<C: CourseStore>(
    store: &C,
    course_id: &CourseId,
    lesson_id: &str,
    material_id: &str,
    patch: MaterialInput,
) -> Result<Material, ApiError> {
    let mut course = get_course(store, course_id)?;
    let lesson_index = find_lesson(&course, lesson_id)?;
    let material_index = find_material(&course.lessons[lesson_index], material_id)?;

    let material = &mut course.lessons[lesson_index].materials[material_index];
    apply_material_update(material, patch);
    let updated = material.clone();

    course.updated_at = Utc::now();
    store.save_course(&course)?;
    Ok(updated)
}

pub fn delete_material<C: CourseStore>(
    store: &C,
    course_id: &CourseId,
    lesson_id: &str,
    material_id: &str,
) -> Result<(), ApiError> {
    let mut course = get_course(store, course_id)?;
    let lesson_index = find_lesson(&course, lesson_id)?;
    let material_index = find_material(&course.lessons[lesson_index], material_id)?;

    course.lessons[lesson_index].materials.remove(material_index);
    course.updated_at = Utc::now();
    store.save_course(&course)
}

fn find_lesson(course: &Course, lesson_id: &str) -> Result<usize, ApiError> {
    course
        .lessons
        .iter()
        .position(|l| ids_match(&l.id, lesson_id))
        .ok_or(ApiError::NotFound("Lesson"))
}

fn find_material(lesson: &Lesson, material_id: &str) -> Result<usize, ApiError> {
    lesson
        .materials
        .iter()
        .position(|m| ids_match(&m.id, material_id))
        .ok_or(ApiError::NotFound("Material"))
}

//! Binary asset upload endpoint

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;
use crate::store::{CourseStore, ReviewStore, UserStore};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Reference path consumable by Material records
    pub url: String,
    pub original_name: String,
    pub mime_type: String,
}

/// POST /api/uploads
///
/// Accepts a single file per request (the first file field). The configured
/// size ceiling is enforced while streaming the field so oversized payloads
/// are rejected without being written to disk.
pub async fn upload<C, U, R>(
    State(state): State<Arc<AppState<C, U, R>>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError>
where
    C: CourseStore,
    U: UserStore,
    R: ReviewStore,
{
    let limit = state.config.max_upload_bytes;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(e.to_string()))?
    {
        let original_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| ApiError::Validation(e.to_string()))?
        {
            if data.len() + chunk.len() > limit {
                return Err(ApiError::PayloadTooLarge(limit));
            }
            data.extend_from_slice(&chunk);
        }

        let stored_name = format!(
            "{}-{}",
            Utc::now().timestamp_millis(),
            sanitize_filename(&original_name)
        );
        let dir = FsPath::new(&state.config.upload_dir);
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;
        tokio::fs::write(dir.join(&stored_name), &data)
            .await
            .map_err(|e| ApiError::Internal(e.to_string()))?;

        tracing::info!(name = %stored_name, bytes = data.len(), "Stored uploaded asset");

        return Ok((
            StatusCode::CREATED,
            Json(UploadResponse {
                url: format!("/uploads/{stored_name}"),
                original_name,
                mime_type,
            }),
        ));
    }

    Err(ApiError::Validation("No file provided.".to_string()))
}

/// Keep `[A-Za-z0-9._-]`, replace everything else; path separators never
/// survive
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_strips_separators() {
        assert_eq!(sanitize_filename("notes v1.pdf"), "notes_v1.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename(""), "file");
    }
}

//! Gallery upload endpoints.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
};

use super::{success, ApiResult};
use crate::errors::AppError;
use crate::models::StoredFile;
use crate::AppState;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// GET /api/uploads - List stored images.
pub async fn list_uploads(State(state): State<AppState>) -> ApiResult<Vec<StoredFile>> {
    success(state.uploads.list().await?)
}

/// POST /api/uploads - Store one image from the `file` field.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<StoredFile> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("image").to_string();
        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field.bytes().await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", e))
            } else {
                AppError::BadRequest(format!("Failed to read upload: {}", e))
            }
        })?;

        return success(state.uploads.store(&original_name, &mime, &bytes).await?);
    }

    Err(AppError::BadRequest(format!(
        "Missing multipart field {:?}",
        FILE_FIELD
    )))
}

/// DELETE /api/uploads/{name} - Remove a stored image.
pub async fn delete_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<()> {
    state.uploads.delete(&name).await?;
    success(())
}

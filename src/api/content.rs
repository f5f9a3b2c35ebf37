//! CMS content endpoints.

use axum::extract::State;
use serde_json::Value;

use super::{success, ApiJson, ApiResult};
use crate::models::ContentBackup;
use crate::AppState;

/// GET /api/content - Current site content.
pub async fn get_content(State(state): State<AppState>) -> ApiResult<Value> {
    success(state.content.current().await?)
}

/// PUT /api/content - Merge a partial document into the site content.
pub async fn update_content(
    State(state): State<AppState>,
    ApiJson(patch): ApiJson<Value>,
) -> ApiResult<Value> {
    let updated = state.content.update(patch).await?;
    tracing::info!("Site content updated");
    success(updated)
}

/// GET /api/content/backups - Previous versions kept by the store.
pub async fn list_backups(State(state): State<AppState>) -> ApiResult<Vec<ContentBackup>> {
    success(state.content.backups().await?)
}

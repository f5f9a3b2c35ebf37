//! Admin session endpoints.

use axum::{extract::State, http::HeaderMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{success, ApiJson, ApiResult};
use crate::auth::request_token;
use crate::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub password: String,
}

/// Issued session token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/admin/login - Exchange the admin password for a session token.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let session = state.sessions.login(&request.password).await?;
    success(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
    })
}

/// POST /api/admin/logout - End the presented session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<()> {
    if let Some(token) = request_token(&headers) {
        state.sessions.logout(&token).await;
    }
    success(())
}

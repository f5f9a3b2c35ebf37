//! Admin authentication for the content panel.
//!
//! The configured password is kept only as a SHA-256 digest and compared in
//! constant time. A successful login issues an opaque session token that
//! must accompany every write as `Authorization: Bearer <token>`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use crate::errors::AppError;

/// Alternative header carrying the session token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Password check and in-memory session tokens.
pub struct SessionStore {
    password_digest: Option<[u8; 32]>,
    ttl: Duration,
    sessions: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl SessionStore {
    /// Without a password every login fails.
    pub fn new(password: Option<&str>, ttl: Duration) -> Self {
        Self {
            password_digest: password.map(digest),
            ttl,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.password_digest.is_some()
    }

    /// Issue a token when `password` matches.
    pub async fn login(&self, password: &str) -> Result<IssuedSession, AppError> {
        let Some(expected) = &self.password_digest else {
            return Err(AppError::Unauthorized(
                "Admin access is not configured".to_string(),
            ));
        };

        // Fixed-length digests, compared in constant time.
        if !bool::from(digest(password)[..].ct_eq(&expected[..])) {
            tracing::warn!("Rejected admin login attempt");
            return Err(AppError::Unauthorized("Invalid password".to_string()));
        }

        let token = format!(
            "{}{}",
            uuid::Uuid::new_v4().simple(),
            uuid::Uuid::new_v4().simple()
        );
        let expires_at = Utc::now()
            + chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::hours(12));

        let mut sessions = self.sessions.write().await;
        let now = Utc::now();
        sessions.retain(|_, expiry| *expiry > now);
        sessions.insert(token.clone(), expires_at);

        tracing::info!("Admin session issued, valid until {}", expires_at);
        Ok(IssuedSession { token, expires_at })
    }

    /// Whether `token` belongs to a live session.
    pub async fn validate(&self, token: &str) -> bool {
        let sessions = self.sessions.read().await;
        sessions
            .iter()
            .any(|(known, expiry)| constant_time_compare(known, token) && *expiry > Utc::now())
    }

    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }
}

fn digest(password: &str) -> [u8; 32] {
    Sha256::digest(password.as_bytes()).into()
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Session token presented with a request, if any.
pub fn request_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string());

    bearer.or_else(|| {
        headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.trim().to_string())
    })
}

/// Admin authentication layer function that takes the session store as a parameter.
pub async fn admin_auth_layer(
    sessions: Arc<SessionStore>,
    request: Request,
    next: Next,
) -> Response {
    match request_token(request.headers()) {
        Some(token) if sessions.validate(&token).await => next.run(request).await,
        Some(_) => AppError::Unauthorized("Invalid or expired session".to_string()).into_response(),
        None => AppError::Unauthorized("Missing admin token".to_string()).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("test-key-123", "test-key-123"));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("test-key-123", "test-key-124"));
        assert!(!constant_time_compare("short", "much-longer-key"));
    }

    #[tokio::test]
    async fn test_login_issues_valid_token() {
        let store = SessionStore::new(Some("tajne-heslo"), Duration::from_secs(3600));

        let session = store.login("tajne-heslo").await.unwrap();
        assert_eq!(session.token.len(), 64);
        assert_ne!(session.token, "tajne-heslo");
        assert!(store.validate(&session.token).await);
        assert!(!store.validate("forged").await);

        store.logout(&session.token).await;
        assert!(!store.validate(&session.token).await);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let store = SessionStore::new(Some("tajne-heslo"), Duration::from_secs(3600));

        let err = store.login("hádám").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn test_disabled_without_password() {
        let store = SessionStore::new(None, Duration::from_secs(3600));

        assert!(!store.is_enabled());
        assert!(store.login("").await.is_err());
    }

    #[tokio::test]
    async fn test_expired_session_invalid() {
        let store = SessionStore::new(Some("heslo"), Duration::ZERO);

        let session = store.login("heslo").await.unwrap();
        assert!(!store.validate(&session.token).await);
    }

    #[test]
    fn test_request_token_sources() {
        let mut headers = axum::http::HeaderMap::new();
        assert_eq!(request_token(&headers), None);

        headers.insert(ADMIN_TOKEN_HEADER, "abc".parse().unwrap());
        assert_eq!(request_token(&headers).as_deref(), Some("abc"));

        headers.insert(header::AUTHORIZATION, "Bearer xyz".parse().unwrap());
        assert_eq!(request_token(&headers).as_deref(), Some("xyz"));
    }
}

//! SQLite key-value store for the content document.
//!
//! Each save archives the previous value in `kv_history` inside the same
//! transaction, keeping the most recent versions only.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use sqlx::{Row, SqlitePool};

use crate::content::{ContentStore, BACKUPS_KEPT};
use crate::errors::AppError;
use crate::models::ContentBackup;

/// Key under which the site content document is stored.
pub const CONTENT_KEY: &str = "site_content";

/// Content store backed by the `kv_store` table.
#[derive(Clone)]
pub struct SqliteContentStore {
    pool: SqlitePool,
    key: String,
}

impl SqliteContentStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            key: CONTENT_KEY.to_string(),
        }
    }
}

#[async_trait]
impl ContentStore for SqliteContentStore {
    async fn load(&self) -> Result<Option<Value>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let raw: String = row.get("value");
                let value = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Storage(format!("Stored content is not valid JSON: {}", e))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, document: &Value) -> Result<(), AppError> {
        let raw = serde_json::to_string(document)
            .map_err(|e| AppError::Internal(format!("Failed to serialize content: {}", e)))?;
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO kv_history (key, value, saved_at) SELECT key, value, updated_at FROM kv_store WHERE key = ?",
        )
        .bind(&self.key)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "DELETE FROM kv_history WHERE key = ? AND id NOT IN (SELECT id FROM kv_history WHERE key = ? ORDER BY id DESC LIMIT ?)",
        )
        .bind(&self.key)
        .bind(&self.key)
        .bind(BACKUPS_KEPT as i64)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(&self.key)
        .bind(&raw)
        .bind(&now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::info!("Saved site content to SQLite");
        Ok(())
    }

    async fn backups(&self) -> Result<Vec<ContentBackup>, AppError> {
        let rows = sqlx::query(
            "SELECT id, saved_at, length(value) AS size FROM kv_history WHERE key = ? ORDER BY id DESC",
        )
        .bind(&self.key)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| ContentBackup {
                name: format!("{}#{}", self.key, row.get::<i64, _>("id")),
                created_at: row.get("saved_at"),
                size_bytes: row.get::<i64, _>("size").max(0) as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use serde_json::json;
    use tempfile::TempDir;

    async fn store(dir: &TempDir) -> SqliteContentStore {
        let pool = init_database(&dir.path().join("content.sqlite"))
            .await
            .unwrap();
        SqliteContentStore::new(pool)
    }

    #[tokio::test]
    async fn test_empty_store_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).await;

        assert!(store.load().await.unwrap().is_none());
        assert!(store.backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_and_archives() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir).await;

        for version in 0..8 {
            store.save(&json!({ "version": version })).await.unwrap();
        }

        assert_eq!(store.load().await.unwrap().unwrap()["version"], 7);
        let backups = store.backups().await.unwrap();
        assert_eq!(backups.len(), BACKUPS_KEPT);
        assert!(backups[0].name.starts_with("site_content#"));
    }
}

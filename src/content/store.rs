//! Persistence backends for the content document.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::errors::AppError;
use crate::models::ContentBackup;

/// Number of previous versions the file store keeps.
pub const BACKUPS_KEPT: usize = 5;

/// Storage for the single site-content document.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// The stored document, or `None` when nothing was saved yet.
    async fn load(&self) -> Result<Option<Value>, AppError>;

    /// Replace the stored document. On error the previous document stays.
    async fn save(&self, document: &Value) -> Result<(), AppError>;

    /// Previous versions, newest first.
    async fn backups(&self) -> Result<Vec<ContentBackup>, AppError> {
        Ok(Vec::new())
    }
}

/// JSON file with rolling backups of the previous versions.
pub struct FileContentStore {
    path: PathBuf,
    backup_dir: PathBuf,
}

impl FileContentStore {
    /// Backups go to a `backups` directory next to the content file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let backup_dir = path
            .parent()
            .map(|p| p.join("backups"))
            .unwrap_or_else(|| PathBuf::from("backups"));
        Self { path, backup_dir }
    }

    async fn rotate_backup(&self) -> Result<(), AppError> {
        if !tokio::fs::try_exists(&self.path).await? {
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.backup_dir).await?;
        let name = format!("content-{}.json", Utc::now().format("%Y%m%dT%H%M%S%.9f"));
        tokio::fs::copy(&self.path, self.backup_dir.join(&name)).await?;

        let mut names = self.backup_names().await?;
        names.sort_unstable_by(|a, b| b.cmp(a));
        for stale in names.iter().skip(BACKUPS_KEPT) {
            if let Err(e) = tokio::fs::remove_file(self.backup_dir.join(stale)).await {
                tracing::warn!("Failed to prune content backup {}: {}", stale, e);
            }
        }
        Ok(())
    }

    async fn backup_names(&self) -> Result<Vec<String>, AppError> {
        let mut names = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.backup_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(names),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("content-") && name.ends_with(".json") {
                names.push(name);
            }
        }
        Ok(names)
    }
}

#[async_trait]
impl ContentStore for FileContentStore {
    async fn load(&self) -> Result<Option<Value>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes).map_err(|e| {
                AppError::Storage(format!("Stored content is not valid JSON: {}", e))
            })?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, document: &Value) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        self.rotate_backup().await?;

        // Write next to the target and rename, so a failed write never truncates it.
        let tmp = self.path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(document)
            .map_err(|e| AppError::Internal(format!("Failed to serialize content: {}", e)))?;
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        tracing::info!("Saved site content to {}", self.path.display());
        Ok(())
    }

    async fn backups(&self) -> Result<Vec<ContentBackup>, AppError> {
        let mut names = self.backup_names().await?;
        names.sort_unstable_by(|a, b| b.cmp(a));

        let mut backups = Vec::with_capacity(names.len());
        for name in names {
            let metadata = tokio::fs::metadata(self.backup_dir.join(&name)).await?;
            let created_at = metadata
                .modified()
                .map(|t| DateTime::<Utc>::from(t).to_rfc3339())
                .unwrap_or_default();
            backups.push(ContentBackup {
                name,
                created_at,
                size_bytes: metadata.len(),
            });
        }
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = FileContentStore::new(dir.path().join("content.json"));

        assert!(store.load().await.unwrap().is_none());
        assert!(store.backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = FileContentStore::new(dir.path().join("data").join("content.json"));

        store.save(&json!({ "hero": { "title": "A" } })).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded["hero"]["title"], "A");
        // First save has nothing to back up.
        assert!(store.backups().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_keeps_five_most_recent_backups() {
        let dir = TempDir::new().unwrap();
        let store = FileContentStore::new(dir.path().join("content.json"));

        for version in 0..8 {
            store.save(&json!({ "version": version })).await.unwrap();
        }

        let backups = store.backups().await.unwrap();
        assert_eq!(backups.len(), BACKUPS_KEPT);

        // Newest backup holds the version before the current one.
        let newest = tokio::fs::read(dir.path().join("backups").join(&backups[0].name))
            .await
            .unwrap();
        let newest: Value = serde_json::from_slice(&newest).unwrap();
        assert_eq!(newest["version"], 6);
        assert_eq!(store.load().await.unwrap().unwrap()["version"], 7);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("content.json");
        tokio::fs::write(&path, b"{ not json").await.unwrap();

        let err = FileContentStore::new(path).load().await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }
}

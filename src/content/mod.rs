//! CMS content: schema defaults, partial updates and persistence.

mod merge;
mod sanitize;
mod store;

pub use merge::deep_merge;
pub use sanitize::sanitize_value;
pub use store::*;

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::errors::AppError;
use crate::models::{ContentBackup, SiteContent};

/// Reads and updates the site content through one [`ContentStore`].
///
/// The document is kept as JSON. Sections known to [`SiteContent`] must match
/// its schema; any other section or field is stored as submitted.
pub struct ContentService {
    store: Arc<dyn ContentStore>,
    write_lock: Mutex<()>,
}

impl ContentService {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }

    /// Current content; missing keys are filled from the schema defaults.
    pub async fn current(&self) -> Result<Value, AppError> {
        let mut document = defaults_value()?;
        if let Some(stored) = self.store.load().await? {
            deep_merge(&mut document, stored);
        }
        check_schema(&document).map_err(|e| {
            AppError::Storage(format!("Stored content does not match the schema: {}", e))
        })?;
        Ok(document)
    }

    /// Sanitize and merge a partial document onto the current content and persist it.
    pub async fn update(&self, mut patch: Value) -> Result<Value, AppError> {
        if !patch.is_object() {
            return Err(AppError::BadRequest(
                "Content update must be a JSON object".to_string(),
            ));
        }
        sanitize_value(&mut patch);

        let _guard = self.write_lock.lock().await;

        let mut document = self.current().await?;
        deep_merge(&mut document, patch);
        check_schema(&document).map_err(|e| {
            AppError::BadRequest(format!("Content does not match the schema: {}", e))
        })?;

        self.store.save(&document).await?;
        Ok(document)
    }

    pub async fn backups(&self) -> Result<Vec<ContentBackup>, AppError> {
        self.store.backups().await
    }
}

fn defaults_value() -> Result<Value, AppError> {
    serde_json::to_value(SiteContent::default())
        .map_err(|e| AppError::Internal(format!("Failed to serialize defaults: {}", e)))
}

/// The known sections must deserialize into [`SiteContent`].
fn check_schema(document: &Value) -> Result<SiteContent, serde_json::Error> {
    SiteContent::deserialize(document)
}

//! Image uploads for the gallery.
//!
//! Files are checked against a MIME allow-list, a size ceiling and the
//! magic bytes of the claimed type, then stored under a generated name.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::models::StoredFile;

/// Public URL prefix under which stored files are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Accepted image types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
    Gif,
}

impl ImageKind {
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Some(ImageKind::Jpeg),
            "image/png" => Some(ImageKind::Png),
            "image/webp" => Some(ImageKind::Webp),
            "image/gif" => Some(ImageKind::Gif),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
            ImageKind::Gif => "gif",
        }
    }

    /// Whether `bytes` starts with this type's signature.
    pub fn matches_signature(&self, bytes: &[u8]) -> bool {
        match self {
            ImageKind::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            ImageKind::Png => bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]),
            ImageKind::Webp => {
                bytes.len() >= 12 && bytes.starts_with(b"RIFF") && &bytes[8..12] == b"WEBP"
            }
            ImageKind::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
        }
    }
}

/// Reduce a client file name to a short lowercase slug without extension.
pub fn sanitize_filename(original: &str) -> String {
    // Drop any client-side directory part.
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };

    let slug = stem
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(50)
        .collect::<String>();

    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}

/// Whether `name` is a plain file name that cannot leave the upload directory.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && !name.starts_with('.')
        && !name.contains("..")
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Directory of uploaded images.
pub struct UploadStore {
    dir: PathBuf,
    max_bytes: usize,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    /// Validate and store one image; returns the stored file.
    pub async fn store(
        &self,
        original_name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<StoredFile, AppError> {
        let kind = ImageKind::from_mime(mime).ok_or_else(|| {
            AppError::BadRequest(format!("File type {} is not allowed", mime))
        })?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        if bytes.len() > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds {} bytes",
                self.max_bytes
            )));
        }
        if !kind.matches_signature(bytes) {
            return Err(AppError::BadRequest(
                "File content does not match its declared type".to_string(),
            ));
        }

        tokio::fs::create_dir_all(&self.dir).await?;

        let unique = uuid::Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}-{}-{}.{}",
            Utc::now().format("%Y%m%d%H%M%S"),
            &unique[..8],
            sanitize_filename(original_name),
            kind.extension()
        );

        let path = self.dir.join(&name);
        let tmp = self.dir.join(format!(".{}.part", name));
        tokio::fs::write(&tmp, bytes).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            tokio::fs::remove_file(&tmp).await.ok();
            return Err(e.into());
        }

        tracing::info!("Stored upload {} ({} bytes)", name, bytes.len());
        Ok(StoredFile {
            url: format!("{}/{}", PUBLIC_PREFIX, name),
            name,
            size_bytes: bytes.len() as u64,
            modified_at: Some(Utc::now().to_rfc3339()),
        })
    }

    /// Stored images, newest name first.
    pub async fn list(&self) -> Result<Vec<StoredFile>, AppError> {
        let mut files = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(files),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !is_safe_name(&name) {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            files.push(StoredFile {
                url: format!("{}/{}", PUBLIC_PREFIX, name),
                name,
                size_bytes: metadata.len(),
                modified_at: metadata
                    .modified()
                    .ok()
                    .map(|t| DateTime::<Utc>::from(t).to_rfc3339()),
            });
        }

        files.sort_by(|a, b| b.name.cmp(&a.name));
        Ok(files)
    }

    /// Delete a stored image by name.
    pub async fn delete(&self, name: &str) -> Result<(), AppError> {
        if !is_safe_name(name) {
            return Err(AppError::BadRequest(format!("Invalid file name {:?}", name)));
        }

        let path = self.dir.join(name);
        // Symlinks could still point outside the directory.
        let resolved = match tokio::fs::canonicalize(&path).await {
            Ok(resolved) => resolved,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!("File {} not found", name)))
            }
            Err(e) => return Err(e.into()),
        };
        let root = tokio::fs::canonicalize(&self.dir).await?;
        if !resolved.starts_with(&root) {
            return Err(AppError::BadRequest(format!("Invalid file name {:?}", name)));
        }

        tokio::fs::remove_file(&resolved).await?;
        tracing::info!("Deleted upload {}", name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];
    const JPEG: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0, 16, b'J', b'F', b'I', b'F'];

    #[test]
    fn test_signatures() {
        assert!(ImageKind::Png.matches_signature(PNG));
        assert!(ImageKind::Jpeg.matches_signature(JPEG));
        assert!(!ImageKind::Jpeg.matches_signature(PNG));
        assert!(ImageKind::Webp.matches_signature(b"RIFF\x24\0\0\0WEBPVP8 "));
        assert!(!ImageKind::Webp.matches_signature(b"RIFF\x24\0\0\0WAVE"));
        assert!(ImageKind::Gif.matches_signature(b"GIF89a\x01\0"));
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Pohled z Terasy (1).JPG"), "pohled-z-terasy-1");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\fotky\\sauna.png"), "sauna");
        assert_eq!(sanitize_filename("čšř.png"), "image");
        assert_eq!(sanitize_filename(".hidden"), "hidden");
    }

    #[test]
    fn test_safe_names() {
        assert!(is_safe_name("20250101120000-abcd1234-sauna.png"));
        assert!(!is_safe_name("../content.json"));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name(".env"));
        assert!(!is_safe_name(""));
    }

    #[tokio::test]
    async fn test_store_list_delete() {
        let dir = TempDir::new().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"), 1024);

        let stored = store.store("Sauna.PNG", "image/png", PNG).await.unwrap();
        assert!(stored.name.ends_with("-sauna.png"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.name));

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].name, stored.name);

        store.delete(&stored.name).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
        assert!(matches!(
            store.delete(&stored.name).await.unwrap_err(),
            AppError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_rejections() {
        let dir = TempDir::new().unwrap();
        let store = UploadStore::new(dir.path(), 8);

        assert!(matches!(
            store.store("a.svg", "image/svg+xml", b"<svg/>").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            store.store("a.png", "image/png", PNG).await.unwrap_err(),
            AppError::PayloadTooLarge(_)
        ));
        assert!(matches!(
            store.store("a.jpg", "image/jpeg", b"GIF89a").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(matches!(
            store.delete("../secret").await.unwrap_err(),
            AppError::BadRequest(_)
        ));
        assert!(store.list().await.unwrap().is_empty());
    }
}

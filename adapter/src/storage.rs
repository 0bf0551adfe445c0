use std::path::{Component, Path, PathBuf};

use shared::{
    config::StorageConfig,
    error::{AppError, AppResult},
};
use uuid::Uuid;

/// Verification images on local disk. Stored names are generated, the
/// original name only contributes its extension.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(cfg: &StorageConfig) -> Self {
        Self {
            root: cfg.upload_dir.clone(),
        }
    }

    /// Writes the uploaded bytes and returns the relative path recorded on
    /// the user row.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = match extension_of(original_name) {
            Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
            None => Uuid::new_v4().to_string(),
        };
        tokio::fs::write(self.root.join(&file_name), bytes).await?;
        Ok(format!("uploads/{file_name}"))
    }

    /// Resolves a stored path for serving. Anything that would escape the
    /// upload directory is refused.
    pub async fn resolve(&self, requested: &str) -> AppResult<(PathBuf, &'static str)> {
        if requested.is_empty() {
            return Err(AppError::UnprocessableEntity("path is required".into()));
        }
        let relative = requested.strip_prefix("uploads/").unwrap_or(requested);
        let candidate = Path::new(relative);
        if candidate
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::UnprocessableEntity("invalid path".into()));
        }

        let full = self.root.join(candidate);
        match tokio::fs::metadata(&full).await {
            Ok(meta) if meta.is_file() => Ok((full, content_type_of(relative))),
            _ => Err(AppError::EntityNotFound("file not found".into())),
        }
    }
}

fn extension_of(name: &str) -> Option<&str> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn content_type_of(name: &str) -> &'static str {
    match extension_of(name).map(str::to_ascii_lowercase).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &Path) -> FileStorage {
        FileStorage::new(&StorageConfig {
            upload_dir: dir.to_path_buf(),
        })
    }

    #[tokio::test]
    async fn stores_and_resolves_with_content_type() {
        let dir = std::env::temp_dir().join(format!("storage-test-{}", Uuid::new_v4()));
        let storage = storage(&dir);

        let stored = storage.store("portrait.JPG", b"fake image").await.unwrap();
        assert!(stored.starts_with("uploads/"));

        let (path, content_type) = storage.resolve(&stored).await.unwrap();
        assert_eq!(content_type, "image/jpeg");
        assert_eq!(tokio::fs::read(path).await.unwrap(), b"fake image");

        tokio::fs::remove_dir_all(dir).await.ok();
    }

    #[tokio::test]
    async fn path_traversal_is_refused() {
        let dir = std::env::temp_dir().join(format!("storage-test-{}", Uuid::new_v4()));
        let storage = storage(&dir);

        assert!(storage.resolve("../etc/passwd").await.is_err());
        assert!(storage.resolve("/etc/passwd").await.is_err());
        assert!(storage.resolve("a/../../b.jpg").await.is_err());
    }
}

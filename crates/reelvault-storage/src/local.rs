use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at `base_path` (e.g. "/var/lib/reelvault/assets").
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage { base_path })
    }

    /// Convert storage key to filesystem path, rejecting keys that escape the root.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key.contains("..")
            || storage_key.starts_with('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.base_path.join(storage_key);

        let base_canonical = self.base_path.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize base path: {}", e))
        })?;

        if let Ok(canonical) = path.canonicalize() {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(StorageError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    async fn ensure_parent_dir(&self, path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<()> {
        let path = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&path).await?;
        let start = std::time::Instant::now();

        let mut file = fs::File::create(&path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to create object: {}", e)))?;
        file.write_all(&data)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to write object: {}", e)))?;
        file.sync_all()
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to sync object: {}", e)))?;

        tracing::info!(
            key = %storage_key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(())
    }

    async fn upload_file(
        &self,
        storage_key: &str,
        source: &Path,
        _content_type: &str,
    ) -> StorageResult<u64> {
        let path = self.key_to_path(storage_key)?;
        self.ensure_parent_dir(&path).await?;
        let start = std::time::Instant::now();

        let size = fs::copy(source, &path)
            .await
            .map_err(|e| StorageError::UploadFailed(format!("Failed to copy object: {}", e)))?;

        tracing::info!(
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local file upload successful"
        );

        Ok(size)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_upload_with_key_writes_object() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .upload_with_key("thumbnails/abc.png", b"png bytes".to_vec(), "image/png")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("thumbnails/abc.png")).unwrap(),
            b"png bytes"
        );
    }

    #[tokio::test]
    async fn test_upload_with_key_replaces_existing_object() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        storage
            .upload_with_key("thumbnails/abc.jpg", b"first".to_vec(), "image/jpeg")
            .await
            .unwrap();
        storage
            .upload_with_key("thumbnails/abc.jpg", b"second".to_vec(), "image/jpeg")
            .await
            .unwrap();

        assert_eq!(
            std::fs::read(dir.path().join("thumbnails/abc.jpg")).unwrap(),
            b"second"
        );
    }

    #[tokio::test]
    async fn test_upload_file_copies_source() {
        let dir = tempdir().unwrap();
        let source_dir = tempdir().unwrap();
        let source = source_dir.path().join("clip.mp4.processing");
        std::fs::write(&source, b"faststart mp4").unwrap();

        let storage = LocalStorage::new(dir.path().join("store")).await.unwrap();
        let written = storage
            .upload_file("landscape/ff.mp4", &source, "video/mp4")
            .await
            .unwrap();

        assert_eq!(written, 13);
        assert!(source.exists(), "source belongs to the caller");
        assert_eq!(
            std::fs::read(dir.path().join("store/landscape/ff.mp4")).unwrap(),
            b"faststart mp4"
        );
    }

    #[tokio::test]
    async fn test_upload_file_missing_source_fails() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path()).await.unwrap();

        let result = storage
            .upload_file("other/ff.mp4", &dir.path().join("absent.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path().join("store")).await.unwrap();

        let result = storage
            .upload_with_key("../escaped.png", b"x".to_vec(), "image/png")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        assert!(!dir.path().join("escaped.png").exists());

        let source = dir.path().join("clip.mp4");
        std::fs::write(&source, b"mp4").unwrap();
        let result = storage.upload_file("/etc/passwd", &source, "video/mp4").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .upload_with_key("", b"x".to_vec(), "image/png")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}

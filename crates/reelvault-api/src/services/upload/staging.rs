//! Request-scoped staging directories.
//!
//! Every upload gets its own directory under the assets root, so two uploads
//! for the same video never share a path. The directory and everything in it
//! (staged input, remux output) goes away when the `StagedUpload` is closed
//! or dropped.

use axum::extract::multipart::Field;
use reelvault_core::AppError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::utils::upload::size_limit_error;

#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_root(&self) -> Result<(), AppError> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            AppError::Internal(format!("Failed to create staging root: {}", e))
        })
    }

    /// Reserve a fresh directory for one upload of `video_id`.
    pub fn stage(&self, video_id: Uuid, extension: &str) -> Result<StagedUpload, AppError> {
        let dir = tempfile::Builder::new()
            .prefix(&format!("upload-{}-", video_id))
            .tempdir_in(&self.root)
            .map_err(|e| AppError::Internal(format!("Failed to create staging directory: {}", e)))?;
        let path = dir.path().join(format!("{}.{}", video_id, extension));

        tracing::debug!(%video_id, "Staging directory created");
        Ok(StagedUpload { dir, path })
    }
}

/// Staging directory owned by a single request.
pub struct StagedUpload {
    dir: TempDir,
    path: PathBuf,
}

impl StagedUpload {
    /// Where the uploaded bytes land.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream a multipart field to the staged path and return its size.
    ///
    /// The byte count is enforced as chunks arrive; the write stops at the
    /// first chunk that crosses `max_bytes`.
    pub async fn write_field(
        &self,
        field: &mut Field<'_>,
        max_bytes: u64,
        what: &str,
    ) -> Result<u64, AppError> {
        let mut file = tokio::fs::File::create(&self.path).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?
        {
            written += chunk.len() as u64;
            if written > max_bytes {
                tracing::debug!(written, max_bytes, "Upload exceeded size limit while streaming");
                return Err(size_limit_error(what, max_bytes));
            }
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        if written == 0 {
            return Err(AppError::BadRequest(format!("{} file is empty", what)));
        }

        tracing::debug!(bytes = written, "Upload staged");
        Ok(written)
    }

    /// Remove the directory and everything in it.
    pub async fn close(self) {
        let dir = self.dir;
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => tracing::debug!("Staging directory removed"),
            Ok(Err(e)) => tracing::error!(error = %e, "Failed to remove staging directory"),
            Err(e) => tracing::error!(error = %e, "Staging cleanup task failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(path: &Path) -> usize {
        std::fs::read_dir(path).unwrap().count()
    }

    #[tokio::test]
    async fn same_video_gets_distinct_directories() {
        let root = tempfile::tempdir().unwrap();
        let area = StagingArea::new(root.path());
        let id = Uuid::new_v4();

        let a = area.stage(id, "mp4").unwrap();
        let b = area.stage(id, "mp4").unwrap();
        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().file_name(), b.path().file_name());
        assert_eq!(entries(root.path()), 2);

        a.close().await;
        b.close().await;
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn close_removes_derived_files() {
        let root = tempfile::tempdir().unwrap();
        let area = StagingArea::new(root.path());
        let staged = area.stage(Uuid::new_v4(), "mp4").unwrap();
        std::fs::write(staged.path(), b"mp4").unwrap();
        let mut remuxed = staged.path().as_os_str().to_owned();
        remuxed.push(".processing");
        std::fs::write(&remuxed, b"mp4").unwrap();

        staged.close().await;
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn dropping_also_cleans_up() {
        let root = tempfile::tempdir().unwrap();
        let area = StagingArea::new(root.path());
        {
            let staged = area.stage(Uuid::new_v4(), "mp4").unwrap();
            std::fs::write(staged.path(), b"mp4").unwrap();
        }
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn ensure_root_creates_missing_directory() {
        let parent = tempfile::tempdir().unwrap();
        let area = StagingArea::new(parent.path().join("assets"));
        area.ensure_root().await.unwrap();
        assert!(area.root().is_dir());
    }
}

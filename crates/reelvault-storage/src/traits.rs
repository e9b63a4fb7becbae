//! Storage abstraction trait
//!
//! This module defines the Storage trait that all durable store backends implement.

use crate::StorageBackend;
use async_trait::async_trait;
use reelvault_core::AppError;
use std::path::Path;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidKey(msg) => AppError::Internal(format!("Invalid storage key: {}", msg)),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Durable object store.
///
/// Implementations only move bytes; callers pick the key (see `keys`) and
/// derive the public URL separately (see `urls`).
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an in-memory object under `storage_key`.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Stream a local file into the store under `storage_key`.
    ///
    /// Returns the number of bytes written. The file is never loaded whole into memory.
    async fn upload_file(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}

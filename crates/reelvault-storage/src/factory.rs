#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{PublicUrlBuilder, Storage, StorageBackend, StorageError, StorageResult};
use reelvault_core::Config;
use std::sync::Arc;

/// Create a storage backend based on configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_endpoint().map(String::from);

            let storage = S3Storage::new(bucket, region, endpoint).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        StorageBackend::Local => {
            let base_path = config.local_storage_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_PATH not configured".to_string())
            })?;

            let storage = LocalStorage::new(base_path).await?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-local"))]
        StorageBackend::Local => Err(StorageError::ConfigError(
            "Local storage backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}

/// Pick the public URL scheme. A CDN distribution wins over any backend URL.
pub fn create_url_builder(config: &Config) -> StorageResult<PublicUrlBuilder> {
    if let Some(host) = config.s3_cf_distribution() {
        return Ok(PublicUrlBuilder::Cdn {
            host: host.to_string(),
        });
    }

    match config.storage_backend() {
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            match config.s3_endpoint() {
                Some(endpoint) => Ok(PublicUrlBuilder::S3Compatible {
                    endpoint: endpoint.to_string(),
                    bucket,
                }),
                None => {
                    let region = config.s3_region().map(String::from).ok_or_else(|| {
                        StorageError::ConfigError(
                            "S3_REGION or AWS_REGION not configured".to_string(),
                        )
                    })?;
                    Ok(PublicUrlBuilder::S3 { bucket, region })
                }
            }
        }
        StorageBackend::Local => {
            let base_url = config.local_storage_base_url().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_STORAGE_BASE_URL not configured".to_string())
            })?;
            Ok(PublicUrlBuilder::Local {
                base_url: base_url.to_string(),
            })
        }
    }
}

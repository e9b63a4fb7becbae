use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::{
    Attribute, AttributeValue, Attributes, ObjectStore, PutMultipartOptions,
    PutOptions, PutPayload, Result as ObjectResult, WriteMultipart,
};
use std::path::Path;
use tokio::io::AsyncReadExt;

const READ_CHUNK_BYTES: usize = 8 * 1024 * 1024;
const MAX_IN_FLIGHT_PARTS: usize = 4;

fn content_type_attributes(content_type: &str) -> Attributes {
    Attributes::from_iter([(
        Attribute::ContentType,
        AttributeValue::from(content_type.to_string()),
    )])
}

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    ///
    /// Credentials are taken from the standard `AWS_*` environment variables.
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage { store, bucket })
    }

    async fn stream_file(
        &self,
        location: &ObjectPath,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        let mut file = tokio::fs::File::open(source).await?;

        let opts = PutMultipartOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };
        let upload = self
            .store
            .put_multipart_opts(location, opts)
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;
        let mut writer = WriteMultipart::new(upload);

        let mut buffer = vec![0u8; READ_CHUNK_BYTES];
        let mut total: u64 = 0;
        loop {
            let read = match file.read(&mut buffer).await {
                Ok(n) => n,
                Err(e) => {
                    let _ = writer.abort().await;
                    return Err(StorageError::IoError(e));
                }
            };
            if read == 0 {
                break;
            }
            if let Err(e) = writer.wait_for_capacity(MAX_IN_FLIGHT_PARTS).await {
                let _ = writer.abort().await;
                return Err(StorageError::UploadFailed(e.to_string()));
            }
            writer.write(&buffer[..read]);
            total += read as u64;
        }

        writer
            .finish()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        Ok(total)
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()> {
        let size = data.len() as u64;
        let location = ObjectPath::from(storage_key.to_string());
        let opts = PutOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };
        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self
            .store
            .put_opts(&location, PutPayload::from(Bytes::from(data)), opts)
            .await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %storage_key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload_with_key failed"
            );
            StorageError::UploadFailed(e.to_string())
        })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload_with_key successful"
        );

        Ok(())
    }

    async fn upload_file(
        &self,
        storage_key: &str,
        source: &Path,
        content_type: &str,
    ) -> StorageResult<u64> {
        let location = ObjectPath::from(storage_key.to_string());
        let start = std::time::Instant::now();

        let size = self
            .stream_file(&location, source, content_type)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %storage_key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 multipart upload failed"
                );
            })?;

        tracing::info!(
            bucket = %self.bucket,
            key = %storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 multipart upload successful"
        );

        Ok(size)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

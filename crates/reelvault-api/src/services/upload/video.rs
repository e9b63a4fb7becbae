//! Video ingestion
//!
//! The caller has already authenticated and checked ownership; nothing in
//! here runs for a request that fails those checks.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use reelvault_core::constants::{VIDEO_CONTENT_TYPE, VIDEO_EXTENSION};
use reelvault_core::{models::Video, AppError};
use reelvault_storage::generate_asset_key;

use super::staging::StagedUpload;
use crate::constants::VIDEO_FIELD;
use crate::state::{AppState, MediaState, ProcessingState};
use crate::utils::upload::{check_declared_size, normalize_mime_type};

pub struct VideoIngestService<'a> {
    media: &'a MediaState,
    processing: &'a ProcessingState,
}

impl<'a> VideoIngestService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            media: &state.media,
            processing: &state.processing,
        }
    }

    /// Run the pipeline for `video` and return the updated record.
    ///
    /// `video_url` is written once, after the durable put has succeeded.
    /// The staging directory is removed on every exit path.
    pub async fn ingest(
        &self,
        video: Video,
        declared_size: Option<u64>,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        check_declared_size(declared_size, self.media.max_video_size_bytes, "Video")?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
        {
            if field.name() == Some(VIDEO_FIELD) {
                return self.ingest_field(video, field).await;
            }
        }

        Err(AppError::BadRequest("Couldn't find the video file".to_string()))
    }

    async fn ingest_field(&self, video: Video, mut field: Field<'_>) -> Result<Video, AppError> {
        if field.file_name().is_none() {
            return Err(AppError::BadRequest(
                "The video field must be a file".to_string(),
            ));
        }

        let content_type = field.content_type().map(normalize_mime_type).unwrap_or_default();
        if content_type != VIDEO_CONTENT_TYPE {
            return Err(AppError::BadRequest(
                "Invalid file type, only MP4 is allowed".to_string(),
            ));
        }

        let staged = self.media.staging.stage(video.id, VIDEO_EXTENSION)?;
        let result = self.process_staged(video, &staged, &mut field).await;
        staged.close().await;
        result
    }

    async fn process_staged(
        &self,
        mut video: Video,
        staged: &StagedUpload,
        field: &mut Field<'_>,
    ) -> Result<Video, AppError> {
        let size = staged
            .write_field(field, self.media.max_video_size_bytes, "Video")
            .await?;

        let category = self.processing.probe.classify(staged.path()).await?;
        let remuxed = self.processing.remuxer.remux(staged.path()).await?;

        let key = generate_asset_key(category.as_str(), VIDEO_EXTENSION);
        let stored = self
            .media
            .storage
            .upload_file(&key, &remuxed, VIDEO_CONTENT_TYPE)
            .await?;

        video.video_url = Some(self.media.urls.url_for(&key));
        let updated = self.media.videos.update_video(&video).await?;

        tracing::info!(
            video_id = %updated.id,
            category = %category,
            uploaded_bytes = size,
            stored_bytes = stored,
            storage_key = %key,
            "Video ingested"
        );
        Ok(updated)
    }
}

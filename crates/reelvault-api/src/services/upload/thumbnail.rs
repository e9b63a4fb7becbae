use axum::extract::multipart::Field;
use axum::extract::Multipart;
use reelvault_core::constants::{THUMBNAIL_CONTENT_TYPES, THUMBNAIL_NAMESPACE};
use reelvault_core::{models::Video, AppError};
use reelvault_storage::generate_asset_key;

use crate::constants::THUMBNAIL_FIELD;
use crate::state::{AppState, MediaState};
use crate::utils::upload::{check_declared_size, normalize_mime_type, read_field_limited};

/// Thumbnails are small enough to buffer, so there is no staging step.
pub struct ThumbnailService<'a> {
    media: &'a MediaState,
}

impl<'a> ThumbnailService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            media: &state.media,
        }
    }

    pub async fn ingest(
        &self,
        video: Video,
        declared_size: Option<u64>,
        mut multipart: Multipart,
    ) -> Result<Video, AppError> {
        check_declared_size(
            declared_size,
            self.media.max_thumbnail_size_bytes,
            "Thumbnail",
        )?;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
        {
            if field.name() == Some(THUMBNAIL_FIELD) {
                return self.ingest_field(video, field).await;
            }
        }

        Err(AppError::BadRequest(
            "Couldn't find the thumbnail file".to_string(),
        ))
    }

    async fn ingest_field(&self, mut video: Video, mut field: Field<'_>) -> Result<Video, AppError> {
        if field.file_name().is_none() {
            return Err(AppError::BadRequest(
                "The thumbnail field must be a file".to_string(),
            ));
        }

        let content_type = field.content_type().map(normalize_mime_type).unwrap_or_default();
        let extension = thumbnail_extension(&content_type).ok_or_else(|| {
            AppError::BadRequest("Invalid file type, only JPEG and PNG are allowed".to_string())
        })?;

        let data = read_field_limited(
            &mut field,
            self.media.max_thumbnail_size_bytes,
            "Thumbnail",
        )
        .await?;
        let size = data.len();

        let key = generate_asset_key(THUMBNAIL_NAMESPACE, extension);
        self.media
            .storage
            .upload_with_key(&key, data, &content_type)
            .await?;

        video.thumbnail_url = Some(self.media.urls.url_for(&key));
        let updated = self.media.videos.update_video(&video).await?;

        tracing::info!(
            video_id = %updated.id,
            bytes = size,
            storage_key = %key,
            "Thumbnail stored"
        );
        Ok(updated)
    }
}

fn thumbnail_extension(content_type: &str) -> Option<&'static str> {
    THUMBNAIL_CONTENT_TYPES
        .iter()
        .find(|(mime, _)| *mime == content_type)
        .map(|(_, ext)| *ext)
}

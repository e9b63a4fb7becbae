use async_trait::async_trait;
use reelvault_core::{models::Video, AppError};
use uuid::Uuid;

/// Metadata collaborator: single source of truth for ownership and asset URLs.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Persist the mutable fields of `video` and return the stored record.
    ///
    /// Fails with `NotFound` if the record disappeared since it was read.
    async fn update_video(&self, video: &Video) -> Result<Video, AppError>;

    /// Remove every video and user. Only reachable on the dev platform.
    async fn reset(&self) -> Result<(), AppError>;
}

use reelvault_core::{models::Video, AppError};
use reelvault_db::VideoStore;
use uuid::Uuid;

/// Fetch a record and check that `user_id` owns it.
///
/// Existence is checked before ownership, so strangers learn only that the
/// id is taken.
pub async fn load_owned_video(
    videos: &dyn VideoStore,
    video_id: Uuid,
    user_id: Uuid,
) -> Result<Video, AppError> {
    let video = videos
        .get_video(video_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

    if !video.is_owned_by(user_id) {
        tracing::warn!(%video_id, %user_id, "User does not own video");
        return Err(AppError::Forbidden("Not authorized to modify this video".to_string()));
    }

    Ok(video)
}

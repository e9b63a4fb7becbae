use crate::error::{ErrorResponse, HttpAppError};
use crate::services::videos::load_owned_video;
use crate::state::AppState;
use crate::utils::upload::parse_video_id;
use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use reelvault_core::models::VideoResponse;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/api/videos/{video_id}",
    tag = "videos",
    params(
        ("video_id" = uuid::Uuid, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video found", body = VideoResponse),
        (status = 400, description = "Invalid video ID", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, headers), fields(video_id = %video_id, operation = "get_video"))]
pub async fn get_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.authenticate_headers(&headers)?;
    let video = load_owned_video(state.media.videos.as_ref(), video_id, user_id).await?;

    Ok(Json(video.into()))
}

use crate::error::{ErrorResponse, HttpAppError};
use crate::services::upload::VideoIngestService;
use crate::services::videos::load_owned_video;
use crate::state::AppState;
use crate::utils::upload::{declared_content_length, parse_video_id};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::HeaderMap,
    Json,
};
use reelvault_core::models::VideoResponse;
use reelvault_core::AppError;
use std::sync::Arc;

/// Upload the video file for an existing record.
///
/// Authentication, the record lookup, and the ownership check all finish
/// before the multipart body is read.
#[utoipa::path(
    post,
    path = "/api/videos/{video_id}/upload",
    tag = "videos",
    params(
        ("video_id" = uuid::Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Form with a `video` file field (video/mp4)"),
    responses(
        (status = 200, description = "Video stored and record updated", body = VideoResponse),
        (status = 400, description = "Invalid ID, missing file, wrong type or oversized", body = ErrorResponse),
        (status = 401, description = "Missing or invalid bearer token", body = ErrorResponse),
        (status = 403, description = "Caller does not own the video", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 500, description = "Processing or storage failure", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, headers, multipart), fields(video_id = %video_id, operation = "upload_video"))]
pub async fn upload_video(
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<VideoResponse>, HttpAppError> {
    let video_id = parse_video_id(&video_id)?;
    let user_id = state.auth.authenticate_headers(&headers)?;
    let video = load_owned_video(state.media.videos.as_ref(), video_id, user_id).await?;

    let multipart = multipart.map_err(|e| {
        AppError::BadRequest(format!("Invalid multipart request: {}", e.body_text()))
    })?;

    let updated = VideoIngestService::new(&state)
        .ingest(video, declared_content_length(&headers), multipart)
        .await?;

    Ok(Json(updated.into()))
}

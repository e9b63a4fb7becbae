use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use reelvault_core::AppError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Wipe all users and videos. Only available on the dev platform.
#[utoipa::path(
    post,
    path = "/admin/reset",
    tag = "admin",
    responses(
        (status = 200, description = "Metadata store reset", body = MessageResponse),
        (status = 403, description = "Not running on the dev platform", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn reset_database(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    if !state.config.is_dev_platform() {
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        )
        .into());
    }

    state.media.videos.reset().await?;
    tracing::info!("Metadata store reset");

    Ok(Json(MessageResponse {
        message: "Database reset to initial state".to_string(),
    }))
}

//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Anything that converts into
//! `AppError` converts into `HttpAppError` too, so `?` renders every failure
//! with the same status, body, and log line.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use reelvault_core::{AppError, ErrorMetadata, LogLevel};
use reelvault_processing::ProcessingError;
use reelvault_storage::StorageError;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        })
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(err.into())
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        HttpAppError(err.into())
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Body without details, swapped in by [`hide_error_details`] in production.
#[derive(Clone)]
struct RedactedErrorBody(ErrorResponse);

fn error_body(app_error: &AppError, with_details: bool) -> ErrorResponse {
    ErrorResponse {
        error: app_error.client_message(),
        details: with_details.then(|| app_error.detailed_message()),
        error_type: with_details.then(|| app_error.error_type().to_string()),
        code: app_error.error_code().to_string(),
        recoverable: app_error.is_recoverable(),
        suggested_action: app_error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        if app_error.is_sensitive() {
            return (status, Json(error_body(app_error, false))).into_response();
        }

        let mut response = (status, Json(error_body(app_error, true))).into_response();
        response
            .extensions_mut()
            .insert(RedactedErrorBody(error_body(app_error, false)));
        response
    }
}

/// Strip error details from responses when running in production.
pub async fn hide_error_details(
    State(state): State<Arc<AppState>>,
    mut response: Response,
) -> Response {
    let redacted = response.extensions_mut().remove::<RedactedErrorBody>();
    match redacted {
        Some(RedactedErrorBody(body)) if state.config.is_production() => {
            (response.status(), Json(body)).into_response()
        }
        _ => response,
    }
}

//! Common utilities for file upload handlers

use crate::constants::MULTIPART_ENVELOPE_BYTES;
use axum::extract::multipart::Field;
use axum::http::{header::CONTENT_LENGTH, HeaderMap};
use reelvault_core::constants::BYTES_PER_MB;
use reelvault_core::AppError;
use uuid::Uuid;

/// Parse a video id path segment.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest("Invalid video ID".to_string()))
}

/// Lowercased media type with parameters stripped (`Video/MP4; codecs=x` -> `video/mp4`).
pub fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase()
}

pub fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

pub fn size_limit_error(what: &str, max_bytes: u64) -> AppError {
    AppError::BadRequest(format!(
        "{} file exceeds the maximum size of {}",
        what,
        human_size(max_bytes)
    ))
}

/// Reject a request whose declared size cannot fit a file of `max_bytes`.
///
/// Runs before the body is read. Requests without a declared size are left
/// to the observed byte count.
pub fn check_declared_size(declared: Option<u64>, max_bytes: u64, what: &str) -> Result<(), AppError> {
    match declared {
        Some(len) if len > max_bytes.saturating_add(MULTIPART_ENVELOPE_BYTES) => {
            tracing::debug!(declared = len, max_bytes, "Declared request size over limit");
            Err(size_limit_error(what, max_bytes))
        }
        _ => Ok(()),
    }
}

/// Buffer a multipart field, failing as soon as it grows past `max_bytes`.
pub async fn read_field_limited(
    field: &mut Field<'_>,
    max_bytes: u64,
    what: &str,
) -> Result<Vec<u8>, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?
    {
        if data.len() as u64 + chunk.len() as u64 > max_bytes {
            return Err(size_limit_error(what, max_bytes));
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Err(AppError::BadRequest(format!("{} file is empty", what)));
    }
    Ok(data)
}

fn human_size(bytes: u64) -> String {
    let mb = BYTES_PER_MB as u64;
    if bytes >= mb && bytes % mb == 0 {
        format!("{} MB", bytes / mb)
    } else {
        format!("{} bytes", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_parse_video_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_video_id("not-a-uuid"),
            Err(AppError::BadRequest(ref m)) if m == "Invalid video ID"
        ));
        assert!(parse_video_id("").is_err());
    }

    #[test]
    fn test_normalize_mime_type() {
        assert_eq!(normalize_mime_type("video/mp4"), "video/mp4");
        assert_eq!(normalize_mime_type("Video/MP4; codecs=\"avc1\""), "video/mp4");
        assert_eq!(normalize_mime_type(""), "");
    }

    #[test]
    fn test_declared_content_length() {
        let mut headers = HeaderMap::new();
        assert_eq!(declared_content_length(&headers), None);
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("2048"));
        assert_eq!(declared_content_length(&headers), Some(2048));
    }

    #[test]
    fn test_check_declared_size() {
        let max = 1024 * 1024;
        assert!(check_declared_size(None, max, "Video").is_ok());
        assert!(check_declared_size(Some(max), max, "Video").is_ok());
        assert!(check_declared_size(Some(max + MULTIPART_ENVELOPE_BYTES), max, "Video").is_ok());
        match check_declared_size(Some(max + MULTIPART_ENVELOPE_BYTES + 1), max, "Video") {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("1 MB"), "{msg}"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}

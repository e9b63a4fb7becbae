//! Constants shared across crates.

/// Only supported container type for video uploads.
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Extension of staged and stored video files.
pub const VIDEO_EXTENSION: &str = "mp4";

/// Thumbnail content types and the extension each is stored under.
pub const THUMBNAIL_CONTENT_TYPES: &[(&str, &str)] = &[("image/jpeg", "jpg"), ("image/png", "png")];

/// Storage namespace for thumbnails.
pub const THUMBNAIL_NAMESPACE: &str = "thumbnails";

/// Platform name that unlocks the reset endpoint.
pub const DEV_PLATFORM: &str = "dev";

pub const BYTES_PER_MB: usize = 1024 * 1024;

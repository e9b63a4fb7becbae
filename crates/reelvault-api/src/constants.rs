//! HTTP-level constants.

/// Multipart field carrying the video file.
pub const VIDEO_FIELD: &str = "video";

/// Multipart field carrying the thumbnail image.
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Allowance for multipart boundaries and part headers when the declared
/// request size is checked against a file ceiling.
pub const MULTIPART_ENVELOPE_BYTES: u64 = 16 * 1024;

/// Issuer claim on access tokens.
pub const JWT_ISSUER: &str = "reelvault-access";

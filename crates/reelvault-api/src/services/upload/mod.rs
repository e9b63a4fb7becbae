//! Upload pipelines
//!
//! Video: declared size → file field → content type → stage → classify →
//! remux → allocate key → durable put → single record update → cleanup.
//! Thumbnails follow the same shape without the processing steps.

pub mod staging;
pub mod thumbnail;
pub mod video;

pub use staging::{StagedUpload, StagingArea};
pub use thumbnail::ThumbnailService;
pub use video::VideoIngestService;

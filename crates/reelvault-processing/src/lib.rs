//! Reelvault media processing
//!
//! Wraps the external media tools used during ingestion: `ffprobe` to classify
//! a staged video by aspect ratio and `ffmpeg` to remux it for fast start.
//! Both run as bounded subprocesses through [`command::ToolCommand`].

pub mod command;
pub mod error;
pub mod video;

pub use error::ProcessingError;
pub use video::{AspectCategory, FastStartRemuxer, VideoDimensions, VideoProbe};

//! Video classification and fast-start remuxing.

mod aspect;
mod faststart;
mod probe;

pub use aspect::AspectCategory;
pub use faststart::{remuxed_path_for, FastStartRemuxer, REMUX_SUFFIX};
pub use probe::{parse_probe_output, VideoDimensions, VideoProbe};

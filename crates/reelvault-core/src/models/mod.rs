//! Data models shared between the store, the pipeline and the HTTP layer.

mod video;

pub use video::*;

//! Application state.
//!
//! Split by concern so services borrow only what they use.

use crate::auth::{AuthState, Authenticator};
use crate::services::upload::StagingArea;
use anyhow::Context;
use reelvault_core::Config;
use reelvault_db::VideoStore;
use reelvault_processing::{FastStartRemuxer, VideoProbe};
use reelvault_storage::{PublicUrlBuilder, Storage};
use std::sync::Arc;

/// Metadata store, durable store, and the local staging area.
#[derive(Clone)]
pub struct MediaState {
    pub videos: Arc<dyn VideoStore>,
    pub storage: Arc<dyn Storage>,
    pub urls: PublicUrlBuilder,
    pub staging: StagingArea,
    pub max_video_size_bytes: u64,
    pub max_thumbnail_size_bytes: u64,
}

/// External media tools.
#[derive(Clone)]
pub struct ProcessingState {
    pub probe: VideoProbe,
    pub remuxer: FastStartRemuxer,
}

pub struct AppState {
    pub config: Config,
    pub media: MediaState,
    pub processing: ProcessingState,
    pub auth: AuthState,
}

impl AppState {
    pub fn new(
        config: Config,
        videos: Arc<dyn VideoStore>,
        storage: Arc<dyn Storage>,
        urls: PublicUrlBuilder,
        authenticator: Arc<dyn Authenticator>,
    ) -> anyhow::Result<Self> {
        let probe = VideoProbe::new(config.ffprobe_path(), config.processing_timeout())
            .context("Invalid FFPROBE_PATH")?;
        let remuxer = FastStartRemuxer::new(config.ffmpeg_path(), config.processing_timeout())
            .context("Invalid FFMPEG_PATH")?;

        let media = MediaState {
            videos,
            storage,
            urls,
            staging: StagingArea::new(config.assets_root().clone()),
            max_video_size_bytes: config.max_video_size_bytes() as u64,
            max_thumbnail_size_bytes: config.max_thumbnail_size_bytes() as u64,
        };

        Ok(Self {
            config,
            media,
            processing: ProcessingState { probe, remuxer },
            auth: AuthState::new(authenticator),
        })
    }
}

//! Shared harness for HTTP tests.
//!
//! Each `TestApp` gets its own staging root, local durable store, in-memory
//! metadata store, and fake `ffprobe` / `ffmpeg` scripts, so tests can run in
//! parallel without sharing state.

#![allow(dead_code)]

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use reelvault_api::auth::{make_jwt, JwtAuthenticator};
use reelvault_api::setup::routes;
use reelvault_api::AppState;
use reelvault_core::{models::Video, BaseConfig, Config, IngestConfig, StorageBackend};
use reelvault_db::test_helpers::InMemoryVideoStore;
use reelvault_storage::{LocalStorage, PublicUrlBuilder};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const JWT_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";
pub const ASSET_BASE_URL: &str = "http://localhost:8091/assets";
pub const MAX_VIDEO_BYTES: usize = 64 * 1024;
pub const MAX_THUMBNAIL_BYTES: usize = 16 * 1024;

/// `ffprobe` reporting a single 1920x1080 stream.
pub const LANDSCAPE_PROBE: &str =
    r#"echo '{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}'"#;
/// `ffprobe` reporting a single 1080x1920 stream.
pub const PORTRAIT_PROBE: &str =
    r#"echo '{"streams":[{"index":0,"codec_type":"video","width":1080,"height":1920}]}'"#;
/// `ffprobe` failing the way it does on a truncated file. `$8` is the input path.
pub const BROKEN_PROBE: &str =
    r#"echo "$8: Invalid data found when processing input" >&2; exit 1"#;
/// `ffmpeg` copying its input (`$6`) to its output (last argument).
pub const COPY_REMUX: &str = "for last; do :; done\ncp \"$6\" \"$last\"";
/// `ffmpeg` failing after naming its input.
pub const BROKEN_REMUX: &str = r#"echo "$6: moov atom not found" >&2; exit 1"#;

pub struct TestOptions {
    pub probe: &'static str,
    pub remux: &'static str,
    pub platform: &'static str,
    pub environment: &'static str,
}

impl Default for TestOptions {
    fn default() -> Self {
        Self {
            probe: LANDSCAPE_PROBE,
            remux: COPY_REMUX,
            platform: "dev",
            environment: "test",
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoStore,
    staging: TempDir,
    store: TempDir,
    _tools: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(TestOptions::default()).await
    }

    pub async fn spawn_with(options: TestOptions) -> Self {
        let staging = tempfile::tempdir().expect("staging dir");
        let store = tempfile::tempdir().expect("store dir");
        let tools = tempfile::tempdir().expect("tools dir");

        let ffprobe = write_tool(tools.path(), "ffprobe", options.probe);
        let ffmpeg = write_tool(tools.path(), "ffmpeg", options.remux);
        let config = test_config(staging.path(), &ffprobe, &ffmpeg, &options);

        let videos = InMemoryVideoStore::new();
        let storage = LocalStorage::new(store.path())
            .await
            .expect("local storage");

        let state = Arc::new(
            AppState::new(
                config.clone(),
                Arc::new(videos.clone()),
                Arc::new(storage),
                PublicUrlBuilder::Local {
                    base_url: ASSET_BASE_URL.to_string(),
                },
                Arc::new(JwtAuthenticator::new(JWT_SECRET)),
            )
            .expect("app state"),
        );

        let app = routes::setup_routes(&config, state).expect("Failed to setup routes");
        let server =
            TestServer::new(app.into_make_service()).expect("Failed to create test server");

        TestApp {
            server,
            videos,
            staging,
            store,
            _tools: tools,
        }
    }

    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Insert a video owned by a fresh user and return it with that user's token.
    pub fn seed_video(&self) -> (Video, String) {
        let owner = Uuid::new_v4();
        let video = Video::new(owner, "boots and cats");
        self.videos.insert(video.clone());
        (video, token_for(owner))
    }

    pub fn staging_entries(&self) -> usize {
        count_files(self.staging.path())
    }

    pub fn stored_files(&self) -> usize {
        count_files(self.store.path())
    }

    pub fn staging_path(&self) -> &Path {
        self.staging.path()
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Remove the durable store's root so every put fails.
    pub fn break_store(&self) {
        std::fs::remove_dir_all(self.store.path()).expect("remove store root");
    }
}

pub fn token_for(user_id: Uuid) -> String {
    make_jwt(user_id, JWT_SECRET, chrono::Duration::hours(1)).expect("token")
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub fn video_form(bytes: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(bytes))
        .file_name("clip.mp4")
        .mime_type(mime);
    MultipartForm::new()
        .add_text("title", "boots and cats")
        .add_part("video", part)
}

pub fn thumbnail_form(bytes: Vec<u8>, mime: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from(bytes))
        .file_name("thumb.png")
        .mime_type(mime);
    MultipartForm::new().add_part("thumbnail", part)
}

/// Bytes that only need to survive a copy; the fake tools never parse them.
pub fn fake_mp4(len: usize) -> Vec<u8> {
    let mut data = b"\x00\x00\x00\x18ftypmp42".to_vec();
    data.resize(len, 0xAB);
    data
}

fn write_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod tool");
    path.to_string_lossy().into_owned()
}

fn count_files(root: &Path) -> usize {
    fn walk(path: &Path, count: &mut usize) {
        let Ok(entries) = std::fs::read_dir(path) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            *count += 1;
            if path.is_dir() {
                walk(&path, count);
            }
        }
    }
    let mut count = 0;
    walk(root, &mut count);
    count
}

fn test_config(assets_root: &Path, ffprobe: &str, ffmpeg: &str, options: &TestOptions) -> Config {
    Config(Box::new(IngestConfig {
        base: BaseConfig {
            server_port: 8091,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 5,
            jwt_secret: JWT_SECRET.to_string(),
            environment: options.environment.to_string(),
            platform: options.platform.to_string(),
        },
        database_url: "postgres://localhost/reelvault_test".to_string(),
        assets_root: PathBuf::from(assets_root),
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        s3_cf_distribution: None,
        local_storage_path: None,
        local_storage_base_url: Some(ASSET_BASE_URL.to_string()),
        ffprobe_path: ffprobe.to_string(),
        ffmpeg_path: ffmpeg.to_string(),
        processing_timeout_secs: 10,
        max_video_size_bytes: MAX_VIDEO_BYTES,
        max_thumbnail_size_bytes: MAX_THUMBNAIL_BYTES,
    }))
}

//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtAuthenticator;
use crate::state::AppState;
use anyhow::{Context, Result};
use reelvault_core::Config;
use reelvault_db::{VideoRepository, VideoStore};
use reelvault_storage::create_url_builder;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.0.base.environment,
        platform = %config.0.base.platform,
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;
    let storage = storage::setup_storage(&config).await?;
    let urls = create_url_builder(&config).context("Failed to configure public URLs")?;

    let videos: Arc<dyn VideoStore> = Arc::new(VideoRepository::new(pool));
    let authenticator = Arc::new(JwtAuthenticator::new(config.jwt_secret()));

    let state = Arc::new(AppState::new(
        config.clone(),
        videos,
        storage,
        urls,
        authenticator,
    )?);
    state
        .media
        .staging
        .ensure_root()
        .await
        .context("Failed to prepare ASSETS_ROOT")?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

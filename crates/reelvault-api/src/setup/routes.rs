//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::error::hide_error_details;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post},
    Json, Router,
};
use reelvault_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    Ok(app_routes(state).layer(cors))
}

/// Routes with request tracing, before CORS.
///
/// Upload size is enforced by the pipelines themselves, so the framework
/// body limit is switched off. Error details are dropped in production.
fn app_routes(state: Arc<AppState>) -> Router<()> {
    Router::new()
        .route(
            "/api/videos/{video_id}/upload",
            post(handlers::video_upload::upload_video),
        )
        .route("/api/videos/{video_id}", get(handlers::video_get::get_video))
        .route(
            "/api/thumbnails/{video_id}",
            post(handlers::thumbnail_upload::upload_thumbnail),
        )
        .route("/admin/reset", post(handlers::admin::reset_database))
        .route("/health", get(handlers::health::liveness))
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(middleware::map_response_with_state(
            state.clone(),
            hide_error_details,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .map_err(|e| anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
            })
            .collect::<Result<Vec<_>, _>>()?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

//! OpenAPI documentation.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use reelvault_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reelvault API",
        version = "0.1.0",
        description = "Video and thumbnail ingestion. Uploaded MP4s are classified by aspect ratio, remuxed for fast start, and placed in durable storage under a random key."
    ),
    paths(
        handlers::video_upload::upload_video,
        handlers::video_get::get_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::admin::reset_database,
        handlers::health::liveness,
    ),
    components(
        schemas(
            models::VideoResponse,
            handlers::admin::MessageResponse,
            handlers::health::HealthResponse,
            error::ErrorResponse,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video record, upload, and thumbnail operations"),
        (name = "admin", description = "Development-only maintenance"),
        (name = "health", description = "Liveness probe")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_upload_routes() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/videos/{video_id}/upload"));
        assert!(doc.paths.paths.contains_key("/api/thumbnails/{video_id}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}

//! Reset, health, and API document endpoints.

#![cfg(unix)]

mod helpers;

use helpers::{TestApp, TestOptions};

#[tokio::test]
async fn test_reset_clears_store_on_dev_platform() {
    let app = TestApp::spawn().await;
    app.seed_video();
    app.seed_video();

    let response = app.client().post("/admin/reset").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["message"], "Database reset to initial state");
    assert!(app.videos.is_empty());
}

#[tokio::test]
async fn test_reset_is_forbidden_outside_dev() {
    let app = TestApp::spawn_with(TestOptions {
        platform: "production",
        ..TestOptions::default()
    })
    .await;
    app.seed_video();

    let response = app.client().post("/admin/reset").await;

    assert_eq!(response.status_code(), 403);
    assert_eq!(app.videos.len(), 1);
}

#[tokio::test]
async fn test_health_reports_alive() {
    let app = TestApp::spawn().await;

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = TestApp::spawn().await;

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert_eq!(body["info"]["title"], "Reelvault API");
    assert!(body["paths"]["/api/videos/{video_id}/upload"].is_object());
}

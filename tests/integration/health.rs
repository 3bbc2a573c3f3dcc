//! Health endpoint integration tests
//!
//! Tests for the health check endpoints:
//! - GET /health - Full health check with dependency status
//! - GET /health/ready - Readiness probe
//! - GET /health/live - Liveness probe

use axum::http::StatusCode;
use serde_json::Value;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_reports_store_and_cache() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(body["checks"]["library_store"]["status"], "healthy");
    assert_eq!(body["stats"]["library_backend"], "memory");
    assert_eq!(body["stats"]["cached_responses"], 0);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_cached_responses_count_grows() {
    let app = TestApp::spawn().await;
    app.tmdb.mock_movie(550, "Fight Club").await;

    app.server
        .get("/api/movies/550")
        .await
        .assert_status(StatusCode::OK);

    let body: Value = app.server.get("/health").await.json();
    assert_eq!(body["stats"]["cached_responses"], 1);
}

#[tokio::test]
async fn test_readiness() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/health/ready").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_liveness() {
    let app = TestApp::spawn().await;

    let response = app.server.get("/health/live").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_needs_no_token() {
    let app = TestApp::spawn().await;

    for path in ["/health", "/health/ready", "/health/live", "/metrics"] {
        let response = app.server.get(path).await;
        assert_ne!(
            response.status_code(),
            StatusCode::UNAUTHORIZED,
            "{} should be public",
            path
        );
    }
}

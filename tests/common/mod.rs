//! Common test utilities for Cinegate
//!
//! Builds the real router on top of the in-memory library store, a manual
//! clock and a mock TMDB server.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderName, HeaderValue};
use axum_test::TestServer;
use serde_json::{json, Value};

use cinegate::{
    config::CacheTtls, routes::create_router, AppState, Config, InMemoryLibraryStore,
    LibraryBackend, ManualClock,
};

use crate::mocks::MockTmdbServer;

/// Test configuration constants
pub mod constants {
    pub const TEST_TMDB_API_KEY: &str = "test-tmdb-api-key";
    pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
    pub const TEST_PASSWORD: &str = "correct horse";
}

/// Config pointing at the mock TMDB server
pub fn test_config(tmdb_url: &str) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        tmdb_api_url: tmdb_url.to_string(),
        tmdb_api_key: constants::TEST_TMDB_API_KEY.to_string(),
        tmdb_language: "tr-TR".to_string(),
        tmdb_region: "TR".to_string(),
        upstream_timeout: Duration::from_secs(2),
        cache_ttls: CacheTtls::default(),
        cache_max_entries: 1000,
        cache_sweep_interval: Duration::ZERO,
        library_backend: LibraryBackend::Memory,
        redis_url: String::new(),
        jwt_secret: constants::TEST_JWT_SECRET.to_string(),
        token_lifetime: Duration::from_secs(7 * 24 * 60 * 60),
        // Lowest cost bcrypt accepts, keeps registration fast
        password_hash_cost: 4,
    }
}

/// A running application with its collaborators
pub struct TestApp {
    pub server: TestServer,
    pub tmdb: MockTmdbServer,
    pub clock: Arc<ManualClock>,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with adjustments to the test config
    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> Self {
        let tmdb = MockTmdbServer::start().await;
        let clock = Arc::new(ManualClock::default());
        let mut config = test_config(&tmdb.uri());
        configure(&mut config);

        let state = Arc::new(
            AppState::from_parts(
                config,
                clock.clone(),
                Arc::new(InMemoryLibraryStore::new()),
            )
            .expect("failed to build app state"),
        );

        let server = TestServer::new(create_router(state.clone()))
            .expect("failed to start test server");

        Self {
            server,
            tmdb,
            clock,
            state,
        }
    }

    /// Register an account and return its session token
    pub async fn register(&self, name: &str, email: &str) -> String {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "name": name,
                "email": email,
                "password": constants::TEST_PASSWORD,
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);

        let body: Value = response.json();
        body["token"]
            .as_str()
            .expect("token in register response")
            .to_string()
    }

    /// Advance the shared clock
    pub fn advance(&self, by: chrono::Duration) {
        self.clock.advance(by);
    }
}

/// `Authorization` header for a token
pub fn bearer(token: &str) -> (HeaderName, HeaderValue) {
    (
        header::AUTHORIZATION,
        format!("Bearer {}", token)
            .parse()
            .expect("valid header value"),
    )
}

//! Cinegate - movie and TV discovery backend
//!
//! This library provides the core functionality for the Cinegate server.
//! It proxies the TMDB catalog through a TTL response cache, issues and
//! verifies session tokens, and keeps per-user favorites and watchlists.

pub mod auth;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod store;
pub mod tmdb;

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::info;

pub use crate::auth::{PasswordHasher, SessionVerifier};
pub use crate::cache::GatewayCache;
pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::config::{Config, LibraryBackend};
pub use crate::store::{InMemoryLibraryStore, LibraryStore, RedisLibraryStore};
pub use crate::tmdb::{Catalog, TmdbClient};

/// Application state shared across all request handlers
pub struct AppState {
    pub config: Config,
    pub start_time: Instant,
    /// Response cache in front of TMDB
    pub gateway_cache: Arc<GatewayCache<Value>>,
    pub catalog: Arc<Catalog>,
    pub sessions: Arc<SessionVerifier>,
    pub passwords: Arc<PasswordHasher>,
    /// Users, favorites and watchlists
    pub library: Arc<dyn LibraryStore>,
}

impl AppState {
    /// Create a new application state
    pub async fn new(config: Config) -> Result<Self> {
        let library: Arc<dyn LibraryStore> = match config.library_backend {
            LibraryBackend::Redis => Arc::new(
                RedisLibraryStore::connect(&config.redis_url)
                    .await
                    .context("Failed to connect to Redis")?,
            ),
            LibraryBackend::Memory => Arc::new(InMemoryLibraryStore::new()),
        };
        info!(backend = library.backend(), "Library store ready");

        Self::from_parts(config, Arc::new(SystemClock), library)
    }

    /// Assemble state around an existing clock and store
    ///
    /// Integration tests use this with a `ManualClock` and the in-memory store.
    pub fn from_parts(
        config: Config,
        clock: Arc<dyn Clock>,
        library: Arc<dyn LibraryStore>,
    ) -> Result<Self> {
        // Initialize HTTP client with connection pooling
        let http_client = reqwest::Client::builder()
            .pool_max_idle_per_host(32)
            .timeout(config.upstream_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        let gateway_cache = Arc::new(GatewayCache::new(clock.clone(), config.cache_max_entries));
        let tmdb_client = Arc::new(TmdbClient::new(http_client, &config));
        let catalog = Arc::new(Catalog::new(gateway_cache.clone(), tmdb_client, &config));

        let sessions = Arc::new(
            SessionVerifier::new(&config.jwt_secret, config.token_lifetime, clock)
                .context("Failed to initialize session verifier")?,
        );
        let passwords = Arc::new(
            PasswordHasher::new(config.password_hash_cost)
                .context("Failed to initialize password hasher")?,
        );

        Ok(Self {
            config,
            start_time: Instant::now(),
            gateway_cache,
            catalog,
            sessions,
            passwords,
            library,
        })
    }
}

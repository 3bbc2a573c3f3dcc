//! Configuration management for Cinegate
//!
//! Configuration is loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which document store backs users, favorites and watchlists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibraryBackend {
    Redis,
    Memory,
}

impl FromStr for LibraryBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "redis" => Ok(Self::Redis),
            "memory" => Ok(Self::Memory),
            other => bail!("Unknown library backend '{}'", other),
        }
    }
}

/// Per-class cache lifetimes for provider resources
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Volatile listings: now playing, popular, search, discover
    pub listing: Duration,
    /// Trending lists
    pub trending: Duration,
    /// Title and person details, credits
    pub detail: Duration,
    /// Near-static data: genres, certifications, provider catalogs
    pub reference: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            listing: Duration::from_secs(300),
            trending: Duration::from_secs(1800),
            detail: Duration::from_secs(3600),
            reference: Duration::from_secs(86_400),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,

    /// TMDB API base URL
    pub tmdb_api_url: String,
    /// TMDB bearer credential
    pub tmdb_api_key: String,
    /// Language sent with localized provider requests
    pub tmdb_language: String,
    /// Region used for listings and watch providers
    pub tmdb_region: String,

    /// Upper bound for a single outbound provider call
    pub upstream_timeout: Duration,
    pub cache_ttls: CacheTtls,
    /// Maximum number of cached payloads (0 disables the bound)
    pub cache_max_entries: usize,
    /// Interval of the background expiry sweep (zero disables it)
    pub cache_sweep_interval: Duration,

    pub library_backend: LibraryBackend,
    /// Redis connection URL
    pub redis_url: String,

    /// Secret used to sign session tokens
    pub jwt_secret: String,
    /// Lifetime of an issued session token
    pub token_lifetime: Duration,
    /// bcrypt work factor for stored passwords
    pub password_hash_cost: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.trim().is_empty() {
            bail!("JWT_SECRET must not be empty");
        }

        Ok(Self {
            host: env::var("CINEGATE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("CINEGATE_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("Invalid CINEGATE_PORT")?,

            tmdb_api_url: env::var("TMDB_API_URL")
                .unwrap_or_else(|_| "https://api.themoviedb.org/3".to_string())
                .trim_end_matches('/')
                .to_string(),
            tmdb_api_key: env::var("TMDB_API_KEY").context("TMDB_API_KEY must be set")?,
            tmdb_language: env::var("TMDB_LANGUAGE").unwrap_or_else(|_| "tr-TR".to_string()),
            tmdb_region: env::var("TMDB_REGION").unwrap_or_else(|_| "TR".to_string()),

            upstream_timeout: seconds_var("UPSTREAM_TIMEOUT_SECONDS", 10)?,
            cache_ttls: CacheTtls {
                listing: seconds_var("CACHE_TTL_LISTING_SECONDS", 300)?,
                trending: seconds_var("CACHE_TTL_TRENDING_SECONDS", 1800)?,
                detail: seconds_var("CACHE_TTL_DETAIL_SECONDS", 3600)?,
                reference: seconds_var("CACHE_TTL_REFERENCE_SECONDS", 86_400)?,
            },
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .context("Invalid CACHE_MAX_ENTRIES")?,
            cache_sweep_interval: seconds_var("CACHE_SWEEP_INTERVAL_SECONDS", 300)?,

            library_backend: env::var("LIBRARY_BACKEND")
                .unwrap_or_else(|_| "redis".to_string())
                .parse()
                .context("Invalid LIBRARY_BACKEND")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),

            jwt_secret,
            token_lifetime: seconds_var("TOKEN_LIFETIME_SECONDS", 7 * 24 * 60 * 60)?,
            password_hash_cost: env::var("BCRYPT_COST")
                .map(|v| v.parse())
                .unwrap_or(Ok(bcrypt::DEFAULT_COST))
                .context("Invalid BCRYPT_COST")?,
        })
    }
}

fn seconds_var(name: &str, default: u64) -> Result<Duration> {
    let secs: u64 = match env::var(name) {
        Ok(v) => v.parse().with_context(|| format!("Invalid {}", name))?,
        Err(_) => default,
    };
    Ok(Duration::from_secs(secs))
}

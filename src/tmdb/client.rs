//! TMDB API client
//!
//! HTTP client for the TMDB v3 API. Responses are returned as raw JSON.

use std::time::Instant;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    config::Config,
    error::{AppError, AppResult},
    routes::metrics::record_upstream_request,
};

/// TMDB API client
pub struct TmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl TmdbClient {
    /// Create a new TMDB client
    pub fn new(client: reqwest::Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.tmdb_api_url.clone(),
            api_key: config.tmdb_api_key.clone(),
        }
    }

    /// GET `{base_url}{path}` with `params` and return the parsed body
    ///
    /// A 404 becomes `NotFound`; every other failure, including transport
    /// errors and unparsable bodies, becomes `UpstreamUnavailable`.
    #[instrument(skip(self, params), fields(path = %path))]
    pub async fn get_json(&self, path: &str, params: &[(String, String)]) -> AppResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        let started = Instant::now();

        debug!(url = %url, "Fetching from TMDB");

        let response = match self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .query(params)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!(error = %e, "Failed to send request to TMDB");
                record_upstream_request("error", started.elapsed().as_secs_f64());
                return Err(e.into());
            }
        };

        let status = response.status();
        record_upstream_request(status.as_str(), started.elapsed().as_secs_f64());
        debug!(status = %status, "TMDB response status");

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, body = %text, "TMDB request failed");

            if status.as_u16() == 404 {
                return Err(AppError::NotFound(format!("TMDB resource not found: {}", path)));
            }

            return Err(AppError::UpstreamUnavailable(format!(
                "TMDB API error {}",
                status
            )));
        }

        let body = response.text().await?;

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(e) => {
                error!(error = %e, "Failed to parse TMDB response");
                Err(AppError::UpstreamUnavailable(format!(
                    "Failed to parse TMDB response: {}",
                    e
                )))
            }
        }
    }

    fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {}", self.api_key)) {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }
}

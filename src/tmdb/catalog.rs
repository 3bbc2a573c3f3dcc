//! Cached TMDB catalog
//!
//! Every provider resource is read through the gateway cache under a key
//! derived from its path and parameters. Each resource class has its own TTL.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{instrument, warn};

use crate::{
    cache::{keys, GatewayCache},
    config::{CacheTtls, Config},
    error::{AppError, AppResult},
    store::ContentType,
    tmdb::{
        client::TmdbClient,
        models::{
            DiscoverFilters, MediaKind, MovieList, ResourceClass, TimeWindow, TrendingMedia,
            TvList,
        },
    },
};

/// Read-through view of the provider catalog
pub struct Catalog {
    cache: Arc<GatewayCache<Value>>,
    client: Arc<TmdbClient>,
    ttls: CacheTtls,
    language: String,
    region: String,
    fetch_timeout: Duration,
}

impl Catalog {
    pub fn new(cache: Arc<GatewayCache<Value>>, client: Arc<TmdbClient>, config: &Config) -> Self {
        Self {
            cache,
            client,
            ttls: config.cache_ttls,
            language: config.tmdb_language.clone(),
            region: config.tmdb_region.clone(),
            fetch_timeout: config.upstream_timeout,
        }
    }

    /// Fetch `path` through the cache
    ///
    /// The outbound call is bounded by the configured timeout; a timeout is
    /// an upstream failure and is not cached.
    async fn fetch(
        &self,
        class: ResourceClass,
        path: &str,
        params: Vec<(String, String)>,
    ) -> AppResult<Value> {
        let key = keys::resource(path, &params);

        self.cache
            .fetch_resource(&key, class.ttl(&self.ttls), || async {
                tokio::time::timeout(self.fetch_timeout, self.client.get_json(path, &params))
                    .await
                    .unwrap_or_else(|_| {
                        Err(AppError::UpstreamUnavailable(format!(
                            "TMDB request timed out after {}s",
                            self.fetch_timeout.as_secs()
                        )))
                    })
            })
            .await
    }

    /// `language` plus any extra parameters
    fn localized(&self, extra: &[(&str, String)]) -> Vec<(String, String)> {
        let mut params = vec![("language".to_string(), self.language.clone())];
        params.extend(extra.iter().map(|(k, v)| (k.to_string(), v.clone())));
        params
    }

    // Movies

    #[instrument(skip(self))]
    pub async fn movie_list(&self, list: MovieList, page: u32) -> AppResult<Value> {
        let params = self.localized(&[
            ("page", page.to_string()),
            ("region", self.region.clone()),
        ]);
        self.fetch(ResourceClass::Listing, list.path(), params).await
    }

    #[instrument(skip(self))]
    pub async fn movie_details(&self, id: u64) -> AppResult<Value> {
        let path = format!("/movie/{}", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    #[instrument(skip(self))]
    pub async fn movie_credits(&self, id: u64) -> AppResult<Value> {
        let path = format!("/movie/{}/credits", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    /// Where a movie can be watched in the configured region
    pub async fn movie_watch_providers(&self, id: u64) -> Option<Value> {
        self.title_watch_providers(MediaKind::Movie, id).await
    }

    // TV

    #[instrument(skip(self))]
    pub async fn tv_list(&self, list: TvList, page: u32) -> AppResult<Value> {
        let params = self.localized(&[("page", page.to_string())]);
        self.fetch(ResourceClass::Listing, list.path(), params).await
    }

    #[instrument(skip(self))]
    pub async fn tv_details(&self, id: u64) -> AppResult<Value> {
        let path = format!("/tv/{}", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    #[instrument(skip(self))]
    pub async fn tv_credits(&self, id: u64) -> AppResult<Value> {
        let path = format!("/tv/{}/credits", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    pub async fn tv_watch_providers(&self, id: u64) -> Option<Value> {
        self.title_watch_providers(MediaKind::Tv, id).await
    }

    /// Region slice of a title's providers, `None` on any failure
    async fn title_watch_providers(&self, media: MediaKind, id: u64) -> Option<Value> {
        let path = format!("/{}/{}/watch/providers", media.as_str(), id);

        match self.fetch(ResourceClass::Detail, &path, Vec::new()).await {
            Ok(value) => value
                .get("results")
                .and_then(|r| r.get(&self.region))
                .filter(|v| !v.is_null())
                .cloned(),
            Err(e) => {
                warn!(error = %e, media = media.as_str(), id, "Watch providers unavailable");
                None
            }
        }
    }

    // People

    #[instrument(skip(self))]
    pub async fn person_details(&self, id: u64) -> AppResult<Value> {
        let path = format!("/person/{}", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    #[instrument(skip(self))]
    pub async fn person_movie_credits(&self, id: u64) -> AppResult<Value> {
        let path = format!("/person/{}/movie_credits", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    #[instrument(skip(self))]
    pub async fn person_tv_credits(&self, id: u64) -> AppResult<Value> {
        let path = format!("/person/{}/tv_credits", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    #[instrument(skip(self))]
    pub async fn person_combined_credits(&self, id: u64) -> AppResult<Value> {
        let path = format!("/person/{}/combined_credits", id);
        self.fetch(ResourceClass::Detail, &path, self.localized(&[])).await
    }

    #[instrument(skip(self))]
    pub async fn person_external_ids(&self, id: u64) -> AppResult<Value> {
        let path = format!("/person/{}/external_ids", id);
        self.fetch(ResourceClass::Reference, &path, Vec::new()).await
    }

    // Search, trending and discover

    #[instrument(skip(self))]
    pub async fn search_multi(&self, query: &str, page: u32) -> AppResult<Value> {
        let params = self.localized(&[("query", query.to_string()), ("page", page.to_string())]);
        self.fetch(ResourceClass::Listing, "/search/multi", params).await
    }

    #[instrument(skip(self))]
    pub async fn search_person(&self, query: &str, page: u32) -> AppResult<Value> {
        let params = self.localized(&[("query", query.to_string()), ("page", page.to_string())]);
        self.fetch(ResourceClass::Listing, "/search/person", params).await
    }

    #[instrument(skip(self))]
    pub async fn trending(
        &self,
        media: TrendingMedia,
        window: TimeWindow,
        page: u32,
    ) -> AppResult<Value> {
        let path = format!("/trending/{}/{}", media.as_str(), window.as_str());
        let params = self.localized(&[("page", page.to_string())]);
        self.fetch(ResourceClass::Trending, &path, params).await
    }

    #[instrument(skip(self, filters))]
    pub async fn discover(&self, media: MediaKind, filters: &DiscoverFilters) -> AppResult<Value> {
        let path = format!("/discover/{}", media.as_str());
        let mut params = self.localized(&[("region", self.region.clone())]);
        params.extend(filters.to_params(media));
        self.fetch(ResourceClass::Listing, &path, params).await
    }

    // Reference data

    #[instrument(skip(self))]
    pub async fn genres(&self, media: MediaKind) -> AppResult<Value> {
        let path = format!("/genre/{}/list", media.as_str());
        self.fetch(ResourceClass::Reference, &path, self.localized(&[])).await
    }

    /// Streaming providers available in the configured region
    #[instrument(skip(self))]
    pub async fn watch_provider_catalog(&self, media: MediaKind) -> AppResult<Value> {
        let path = format!("/watch/providers/{}", media.as_str());
        let params = self.localized(&[("watch_region", self.region.clone())]);
        self.fetch(ResourceClass::Reference, &path, params).await
    }

    #[instrument(skip(self))]
    pub async fn movie_certifications(&self) -> AppResult<Value> {
        self.fetch(ResourceClass::Reference, "/certification/movie/list", Vec::new())
            .await
    }

    /// Details for a library entry's content
    pub async fn details(&self, content_type: ContentType, id: u64) -> AppResult<Value> {
        match content_type {
            ContentType::Movie => self.movie_details(id).await,
            ContentType::Tv => self.tv_details(id).await,
            ContentType::Person => self.person_details(id).await,
        }
    }
}

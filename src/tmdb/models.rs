//! Catalog request models
//!
//! Response payloads are passed through as `serde_json::Value`; only the
//! request side is typed.

use serde::Deserialize;

use crate::config::CacheTtls;
use std::time::Duration;

/// Cache lifetime class of a provider resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    Listing,
    Trending,
    Detail,
    Reference,
}

impl ResourceClass {
    pub fn ttl(&self, ttls: &CacheTtls) -> Duration {
        match self {
            ResourceClass::Listing => ttls.listing,
            ResourceClass::Trending => ttls.trending,
            ResourceClass::Detail => ttls.detail,
            ResourceClass::Reference => ttls.reference,
        }
    }
}

/// Movie or TV, for endpoints that exist for both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Tv,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Movie => "movie",
            MediaKind::Tv => "tv",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingMedia {
    All,
    Movie,
    Tv,
    Person,
}

impl TrendingMedia {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendingMedia::All => "all",
            TrendingMedia::Movie => "movie",
            TrendingMedia::Tv => "tv",
            TrendingMedia::Person => "person",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Curated movie lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovieList {
    NowPlaying,
    Popular,
    Upcoming,
    TopRated,
}

impl MovieList {
    pub fn path(&self) -> &'static str {
        match self {
            MovieList::NowPlaying => "/movie/now_playing",
            MovieList::Popular => "/movie/popular",
            MovieList::Upcoming => "/movie/upcoming",
            MovieList::TopRated => "/movie/top_rated",
        }
    }
}

/// Curated TV lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TvList {
    AiringToday,
    OnTheAir,
    Popular,
    TopRated,
}

impl TvList {
    pub fn path(&self) -> &'static str {
        match self {
            TvList::AiringToday => "/tv/airing_today",
            TvList::OnTheAir => "/tv/on_the_air",
            TvList::Popular => "/tv/popular",
            TvList::TopRated => "/tv/top_rated",
        }
    }
}

/// `?page=` query
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

impl PageQuery {
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// `?query=&page=` search query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub query: String,
    pub page: Option<u32>,
}

/// Discover filters, accepted as query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverFilters {
    pub sort_by: Option<String>,
    pub with_genres: Option<String>,
    pub with_original_language: Option<String>,
    #[serde(rename = "with_runtime.gte")]
    pub runtime_gte: Option<u32>,
    #[serde(rename = "with_runtime.lte")]
    pub runtime_lte: Option<u32>,
    #[serde(rename = "vote_average.gte")]
    pub vote_average_gte: Option<f32>,
    #[serde(rename = "vote_count.gte")]
    pub vote_count_gte: Option<u32>,
    pub year: Option<u32>,
    pub with_cast: Option<String>,
    pub with_status: Option<String>,
    pub with_type: Option<String>,
    #[serde(rename = "release_date.gte")]
    pub release_date_gte: Option<String>,
    #[serde(rename = "release_date.lte")]
    pub release_date_lte: Option<String>,
    #[serde(rename = "air_date.gte")]
    pub air_date_gte: Option<String>,
    #[serde(rename = "air_date.lte")]
    pub air_date_lte: Option<String>,
    pub page: Option<u32>,
}

impl DiscoverFilters {
    /// Provider query parameters for these filters
    ///
    /// `year` maps to `primary_release_year` for movies and
    /// `first_air_date_year` for TV. Adult titles are always excluded.
    pub fn to_params(&self, media: MediaKind) -> Vec<(String, String)> {
        let mut params = vec![
            ("include_adult".to_string(), "false".to_string()),
            ("page".to_string(), self.page.unwrap_or(1).max(1).to_string()),
        ];

        let mut push = |name: &str, value: Option<String>| {
            if let Some(v) = value.filter(|v| !v.is_empty()) {
                params.push((name.to_string(), v));
            }
        };

        push("sort_by", self.sort_by.clone());
        push("with_genres", self.with_genres.clone());
        push("with_original_language", self.with_original_language.clone());
        push("with_runtime.gte", self.runtime_gte.map(|v| v.to_string()));
        push("with_runtime.lte", self.runtime_lte.map(|v| v.to_string()));
        push("vote_average.gte", self.vote_average_gte.map(|v| v.to_string()));
        push("vote_count.gte", self.vote_count_gte.map(|v| v.to_string()));
        push("with_cast", self.with_cast.clone());
        push("with_status", self.with_status.clone());
        push("with_type", self.with_type.clone());
        push("release_date.gte", self.release_date_gte.clone());
        push("release_date.lte", self.release_date_lte.clone());
        push("air_date.gte", self.air_date_gte.clone());
        push("air_date.lte", self.air_date_lte.clone());

        let year_param = match media {
            MediaKind::Movie => "primary_release_year",
            MediaKind::Tv => "first_air_date_year",
        };
        push(year_param, self.year.map(|v| v.to_string()));

        params
    }
}

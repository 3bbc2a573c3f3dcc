//! Catalog pass-through endpoints
//!
//! Thin handlers over [`Catalog`](crate::tmdb::Catalog). Payloads are
//! returned as received from the provider.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    tmdb::{
        DiscoverFilters, MediaKind, MovieList, PageQuery, SearchQuery, TimeWindow, TrendingMedia,
        TvList,
    },
    AppState,
};

// Movies

pub async fn now_playing_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_list(MovieList::NowPlaying, query.page()).await?))
}

pub async fn popular_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_list(MovieList::Popular, query.page()).await?))
}

pub async fn upcoming_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_list(MovieList::Upcoming, query.page()).await?))
}

pub async fn top_rated_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_list(MovieList::TopRated, query.page()).await?))
}

pub async fn movie_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_details(id).await?))
}

pub async fn movie_credits(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_credits(id).await?))
}

/// Region slice of the title's providers, or `null`
pub async fn movie_watch_providers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Json<Option<Value>> {
    Json(state.catalog.movie_watch_providers(id).await)
}

// TV

pub async fn airing_today_tv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.tv_list(TvList::AiringToday, query.page()).await?))
}

pub async fn on_the_air_tv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.tv_list(TvList::OnTheAir, query.page()).await?))
}

pub async fn popular_tv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.tv_list(TvList::Popular, query.page()).await?))
}

pub async fn top_rated_tv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.tv_list(TvList::TopRated, query.page()).await?))
}

pub async fn tv_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.tv_details(id).await?))
}

pub async fn tv_credits(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.tv_credits(id).await?))
}

pub async fn tv_watch_providers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Json<Option<Value>> {
    Json(state.catalog.tv_watch_providers(id).await)
}

// People

pub async fn person_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.person_details(id).await?))
}

pub async fn person_movie_credits(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.person_movie_credits(id).await?))
}

pub async fn person_tv_credits(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.person_tv_credits(id).await?))
}

pub async fn person_combined_credits(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.person_combined_credits(id).await?))
}

pub async fn person_external_ids(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.person_external_ids(id).await?))
}

// Search, trending, discover

fn require_query(query: &SearchQuery) -> AppResult<&str> {
    let trimmed = query.query.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("query is required".to_string()));
    }
    Ok(trimmed)
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let text = require_query(&query)?;
    let page = query.page.unwrap_or(1).max(1);
    Ok(Json(state.catalog.search_multi(text, page).await?))
}

pub async fn search_person(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Value>> {
    let text = require_query(&query)?;
    let page = query.page.unwrap_or(1).max(1);
    Ok(Json(state.catalog.search_person(text, page).await?))
}

pub async fn trending(
    State(state): State<Arc<AppState>>,
    Path((media, window)): Path<(TrendingMedia, TimeWindow)>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.trending(media, window, query.page()).await?))
}

pub async fn discover(
    State(state): State<Arc<AppState>>,
    Path(media): Path<MediaKind>,
    Query(filters): Query<DiscoverFilters>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.discover(media, &filters).await?))
}

// Reference data

pub async fn genres(
    State(state): State<Arc<AppState>>,
    Path(media): Path<MediaKind>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.genres(media).await?))
}

pub async fn watch_provider_catalog(
    State(state): State<Arc<AppState>>,
    Path(media): Path<MediaKind>,
) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.watch_provider_catalog(media).await?))
}

pub async fn movie_certifications(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    Ok(Json(state.catalog.movie_certifications().await?))
}

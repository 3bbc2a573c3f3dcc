//! Favorites and watchlist endpoints
//!
//! Both lists share one set of handlers; the route decides which list is
//! addressed. Listings are enriched with catalog details on a best-effort
//! basis: a failed lookup leaves `details` null.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    middleware::auth::AuthenticatedUser,
    routes::ApiJson,
    store::{ContentType, EntryFilter, EntryKey, LibraryEntry, ListKind},
    AppState,
};

/// Body of POST and DELETE
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItemRequest {
    #[serde(rename = "type", default)]
    pub content_type: String,
    pub item_id: Option<u64>,
}

/// Query of GET
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryQuery {
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub item_id: Option<String>,
}

/// A listed entry with its catalog details
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryItem {
    pub id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub item_id: u64,
    pub created_at: DateTime<Utc>,
    pub details: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_content_type(raw: &str) -> AppResult<ContentType> {
    ContentType::parse(raw.trim())
        .ok_or_else(|| AppError::BadRequest(format!("Invalid type '{}'", raw)))
}

impl LibraryItemRequest {
    fn into_key(self, list: ListKind, user_id: &str) -> AppResult<EntryKey> {
        let item_id = match self.item_id {
            Some(id) if id > 0 && !self.content_type.trim().is_empty() => id,
            _ => {
                return Err(AppError::BadRequest(
                    "type and itemId are required".to_string(),
                ))
            }
        };

        let content_type = parse_content_type(&self.content_type)?;
        list.check(content_type)?;

        Ok(EntryKey::new(user_id, content_type, item_id))
    }
}

impl LibraryQuery {
    fn into_filter(self) -> AppResult<EntryFilter> {
        let content_type = match self.content_type.as_deref().filter(|t| !t.is_empty()) {
            Some(raw) => Some(parse_content_type(raw)?),
            None => None,
        };
        let item_id = match self.item_id.as_deref().filter(|i| !i.is_empty()) {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|_| AppError::BadRequest(format!("Invalid itemId '{}'", raw)))?,
            ),
            None => None,
        };

        Ok(EntryFilter {
            content_type,
            item_id,
        })
    }
}

#[instrument(skip_all, fields(list = list.as_str(), user_id = %user_id))]
async fn add(
    state: &AppState,
    list: ListKind,
    user_id: &str,
    request: LibraryItemRequest,
) -> AppResult<(StatusCode, Json<LibraryEntry>)> {
    let key = request.into_key(list, user_id)?;
    let entry = LibraryEntry::new(&key);

    state.library.add_entry(list, &entry).await?;
    debug!(item_id = key.item_id, "Entry added");

    Ok((StatusCode::CREATED, Json(entry)))
}

#[instrument(skip_all, fields(list = list.as_str(), user_id = %user_id))]
async fn remove(
    state: &AppState,
    list: ListKind,
    user_id: &str,
    request: LibraryItemRequest,
) -> AppResult<Json<MessageResponse>> {
    let key = request.into_key(list, user_id)?;
    state.library.remove_entry(list, &key).await?;

    Ok(Json(MessageResponse {
        message: format!("{} removed", list.label()),
    }))
}

#[instrument(skip_all, fields(list = list.as_str(), user_id = %user_id))]
async fn list_with_details(
    state: &AppState,
    list: ListKind,
    user_id: &str,
    query: LibraryQuery,
) -> AppResult<Json<Vec<LibraryItem>>> {
    let filter = query.into_filter()?;
    let entries = state.library.list_entries(list, user_id, &filter).await?;

    let items = join_all(entries.into_iter().map(|entry| async move {
        let details = match state.catalog.details(entry.content_type, entry.item_id).await {
            Ok(details) => Some(details),
            Err(e) => {
                warn!(
                    error = %e,
                    content_type = %entry.content_type,
                    item_id = entry.item_id,
                    "Failed to fetch details for library entry"
                );
                None
            }
        };

        LibraryItem {
            id: entry.id,
            content_type: entry.content_type,
            item_id: entry.item_id,
            created_at: entry.created_at,
            details,
        }
    }))
    .await;

    Ok(Json(items))
}

pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<LibraryItemRequest>,
) -> AppResult<(StatusCode, Json<LibraryEntry>)> {
    add(&state, ListKind::Favorites, &user.user_id, request).await
}

pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<LibraryItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    remove(&state, ListKind::Favorites, &user.user_id, request).await
}

pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<LibraryQuery>,
) -> AppResult<Json<Vec<LibraryItem>>> {
    list_with_details(&state, ListKind::Favorites, &user.user_id, query).await
}

pub async fn add_to_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<LibraryItemRequest>,
) -> AppResult<(StatusCode, Json<LibraryEntry>)> {
    add(&state, ListKind::Watchlist, &user.user_id, request).await
}

pub async fn remove_from_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    ApiJson(request): ApiJson<LibraryItemRequest>,
) -> AppResult<Json<MessageResponse>> {
    remove(&state, ListKind::Watchlist, &user.user_id, request).await
}

pub async fn list_watchlist(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(query): Query<LibraryQuery>,
) -> AppResult<Json<Vec<LibraryItem>>> {
    list_with_details(&state, ListKind::Watchlist, &user.user_id, query).await
}

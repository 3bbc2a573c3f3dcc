//! Library store data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// A registered account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(name: &str, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: normalize_email(email),
            password_hash,
            image: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            image: self.image.clone(),
        }
    }
}

/// Public view of an account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: String,
}

/// Partial profile update; at least one field must be set
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub image: Option<String>,
}

impl ProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.as_deref().map_or(true, |n| n.trim().is_empty())
            && self.image.as_deref().map_or(true, str::is_empty)
    }

    pub fn apply(&self, user: &mut UserRecord) {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            user.name = name.to_string();
        }
        if let Some(image) = self.image.as_deref().filter(|i| !i.is_empty()) {
            user.image = image.to_string();
        }
        user.updated_at = Utc::now();
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Kind of provider content a library entry points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
    Person,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
            ContentType::Person => "person",
        }
    }

    /// Parse a content type as sent by clients
    ///
    /// The provider labels regular shows `Scripted` and clients echo that
    /// back, so it is accepted as an alias for `tv`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "movie" => Some(ContentType::Movie),
            "tv" | "Scripted" | "scripted" => Some(ContentType::Tv),
            "person" => Some(ContentType::Person),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ContentType::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid content type '{}'", raw)))
    }
}

/// The two per-user lists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Favorites,
    Watchlist,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Favorites => "favorites",
            ListKind::Watchlist => "watchlist",
        }
    }

    /// Human label used in error messages
    pub fn label(&self) -> &'static str {
        match self {
            ListKind::Favorites => "Favorite",
            ListKind::Watchlist => "Watchlist item",
        }
    }

    pub fn accepts(&self, content_type: ContentType) -> bool {
        match self {
            ListKind::Favorites => true,
            ListKind::Watchlist => content_type != ContentType::Person,
        }
    }

    /// Reject content types the list does not hold
    pub fn check(&self, content_type: ContentType) -> AppResult<()> {
        if self.accepts(content_type) {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "{} cannot hold content of type '{}'",
                self.as_str(),
                content_type
            )))
        }
    }
}

/// Identity of a library entry within one list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryKey {
    pub user_id: String,
    pub content_type: ContentType,
    pub item_id: u64,
}

impl EntryKey {
    pub fn new(user_id: &str, content_type: ContentType, item_id: u64) -> Self {
        Self {
            user_id: user_id.to_string(),
            content_type,
            item_id,
        }
    }

    /// Hash field used by the Redis backend: `{type}:{item_id}`
    pub fn field(&self) -> String {
        format!("{}:{}", self.content_type, self.item_id)
    }
}

/// A favorite or watchlist record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    pub id: String,
    pub user_id: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub item_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LibraryEntry {
    pub fn new(key: &EntryKey) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: key.user_id.clone(),
            content_type: key.content_type,
            item_id: key.item_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn key(&self) -> EntryKey {
        EntryKey::new(&self.user_id, self.content_type, self.item_id)
    }
}

/// Optional narrowing for list queries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryFilter {
    pub content_type: Option<ContentType>,
    pub item_id: Option<u64>,
}

impl EntryFilter {
    pub fn matches(&self, entry: &LibraryEntry) -> bool {
        self.content_type.map_or(true, |t| t == entry.content_type)
            && self.item_id.map_or(true, |id| id == entry.item_id)
    }
}

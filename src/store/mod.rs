//! Library store
//!
//! Persists accounts and the per-user favorites and watchlist. Two backends
//! share one trait: Redis for deployments and an in-memory map for
//! development and tests.

pub mod memory;
pub mod models;
pub mod redis;

use async_trait::async_trait;

use crate::error::AppResult;

pub use self::memory::InMemoryLibraryStore;
pub use self::models::{
    ContentType, EntryFilter, EntryKey, LibraryEntry, ListKind, ProfileUpdate, UserProfile,
    UserRecord,
};
pub use self::redis::RedisLibraryStore;

/// Document store for users, favorites and watchlists
///
/// Implementations MUST:
/// - keep at most one entry per (list, user, content type, item id) and
///   report a second insert as `AppError::DuplicateEntry`
/// - report removal of a missing entry as `AppError::NotFound` without
///   changing anything
/// - keep email addresses unique across accounts
#[async_trait]
pub trait LibraryStore: Send + Sync {
    /// Backend name for logging and health output
    fn backend(&self) -> &'static str;

    /// Check connectivity
    async fn ping(&self) -> AppResult<()>;

    async fn create_user(&self, user: &UserRecord) -> AppResult<()>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>>;

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<UserRecord>>;

    /// Apply a partial update and return the stored result
    async fn update_user(&self, id: &str, update: &ProfileUpdate) -> AppResult<UserRecord>;

    async fn add_entry(&self, list: ListKind, entry: &LibraryEntry) -> AppResult<()>;

    async fn remove_entry(&self, list: ListKind, key: &EntryKey) -> AppResult<()>;

    /// Entries of one user, oldest first
    async fn list_entries(
        &self,
        list: ListKind,
        user_id: &str,
        filter: &EntryFilter,
    ) -> AppResult<Vec<LibraryEntry>>;
}

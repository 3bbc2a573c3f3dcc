//! Redis-backed library store
//!
//! Layout:
//! - `cinegate:user:{id}`: user record as JSON
//! - `cinegate:user-email:{email}`: user id, claimed with SET NX
//! - `cinegate:{favorites|watchlist}:{user_id}`: hash of `{type}:{item_id}` to entry JSON
//!
//! Uniqueness relies on the atomicity of SET NX and HSETNX, so two racing
//! inserts for the same key can never both succeed.

use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, instrument, warn};

use crate::error::{AppError, AppResult};
use crate::store::models::normalize_email;
use crate::store::{
    EntryFilter, EntryKey, LibraryEntry, LibraryStore, ListKind, ProfileUpdate, UserRecord,
};

/// Library store on a shared Redis connection
pub struct RedisLibraryStore {
    conn: redis::aio::ConnectionManager,
}

impl RedisLibraryStore {
    pub fn new(conn: redis::aio::ConnectionManager) -> Self {
        Self { conn }
    }

    /// Open a managed connection to `redis_url`
    pub async fn connect(redis_url: &str) -> AppResult<Self> {
        let client = redis::Client::open(redis_url)?;
        let conn = redis::aio::ConnectionManager::new(client).await?;
        Ok(Self::new(conn))
    }

    async fn write_user(&self, user: &UserRecord) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let serialized = serde_json::to_string(user)?;
        let _: () = conn.set(keys::user(&user.id), serialized).await?;
        Ok(())
    }
}

#[async_trait]
impl LibraryStore for RedisLibraryStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> AppResult<()> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<_, String>(&mut conn).await?;
        Ok(())
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create_user(&self, user: &UserRecord) -> AppResult<()> {
        let mut conn = self.conn.clone();

        let claimed: bool = conn
            .set_nx(keys::user_email(&user.email), &user.id)
            .await?;
        if !claimed {
            debug!("Email already registered");
            return Err(AppError::DuplicateEntry(
                "An account with this email already exists".to_string(),
            ));
        }

        if let Err(e) = self.write_user(user).await {
            // Release the email so the address is not locked by a failed write
            let released: Result<(), redis::RedisError> =
                conn.del(keys::user_email(&user.email)).await;
            if let Err(release_err) = released {
                warn!(error = %release_err, "Failed to release email claim");
            }
            return Err(e);
        }

        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let mut conn = self.conn.clone();
        let id: Option<String> = conn.get(keys::user_email(&normalize_email(email))).await?;

        match id {
            Some(id) => self.find_user_by_id(&id).await,
            None => Ok(None),
        }
    }

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<UserRecord>> {
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.get(keys::user(id)).await?;

        match value {
            Some(v) => Ok(Some(serde_json::from_str(&v)?)),
            None => Ok(None),
        }
    }

    #[instrument(skip(self, update))]
    async fn update_user(&self, id: &str, update: &ProfileUpdate) -> AppResult<UserRecord> {
        let mut user = self
            .find_user_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        update.apply(&mut user);
        self.write_user(&user).await?;
        Ok(user)
    }

    #[instrument(skip(self, entry), fields(list = list.as_str(), user_id = %entry.user_id, item_id = entry.item_id))]
    async fn add_entry(&self, list: ListKind, entry: &LibraryEntry) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let serialized = serde_json::to_string(entry)?;

        let inserted: bool = conn
            .hset_nx(keys::list(list, &entry.user_id), entry.key().field(), serialized)
            .await?;

        if !inserted {
            return Err(AppError::DuplicateEntry(format!(
                "{} already exists",
                list.label()
            )));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(list = list.as_str()))]
    async fn remove_entry(&self, list: ListKind, key: &EntryKey) -> AppResult<()> {
        let mut conn = self.conn.clone();
        let removed: i64 = conn.hdel(keys::list(list, &key.user_id), key.field()).await?;

        if removed == 0 {
            return Err(AppError::NotFound(format!("{} not found", list.label())));
        }
        Ok(())
    }

    async fn list_entries(
        &self,
        list: ListKind,
        user_id: &str,
        filter: &EntryFilter,
    ) -> AppResult<Vec<LibraryEntry>> {
        let mut conn = self.conn.clone();
        let values: Vec<String> = conn.hvals(keys::list(list, user_id)).await?;

        let mut entries = Vec::with_capacity(values.len());
        for value in values {
            let entry: LibraryEntry = serde_json::from_str(&value)?;
            if filter.matches(&entry) {
                entries.push(entry);
            }
        }
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}

/// Redis key builders
pub mod keys {
    use crate::store::ListKind;

    pub fn user(id: &str) -> String {
        format!("cinegate:user:{}", id)
    }

    pub fn user_email(email: &str) -> String {
        format!("cinegate:user-email:{}", email)
    }

    pub fn list(list: ListKind, user_id: &str) -> String {
        format!("cinegate:{}:{}", list.as_str(), user_id)
    }
}

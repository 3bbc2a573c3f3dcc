//! In-memory library store
//!
//! Same contract as the Redis store without any external service. Used for
//! local development (`LIBRARY_BACKEND=memory`) and integration tests.
//! Contents are lost on restart.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::error::{AppError, AppResult};
use crate::store::models::normalize_email;
use crate::store::{
    EntryFilter, EntryKey, LibraryEntry, LibraryStore, ListKind, ProfileUpdate, UserRecord,
};

/// One user's list, keyed by `{type}:{item_id}`
type UserList = HashMap<String, LibraryEntry>;

/// Library store held in process memory
#[derive(Default)]
pub struct InMemoryLibraryStore {
    users: DashMap<String, UserRecord>,
    emails: DashMap<String, String>,
    lists: DashMap<(ListKind, String), UserList>,
}

impl InMemoryLibraryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries a user has in a list
    pub fn entry_count(&self, list: ListKind, user_id: &str) -> usize {
        self.lists
            .get(&(list, user_id.to_string()))
            .map(|l| l.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl LibraryStore for InMemoryLibraryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }

    async fn create_user(&self, user: &UserRecord) -> AppResult<()> {
        match self.emails.entry(user.email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::DuplicateEntry(
                "An account with this email already exists".to_string(),
            )),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                self.users.insert(user.id.clone(), user.clone());
                slot.insert(user.id.clone());
                Ok(())
            }
        }
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<UserRecord>> {
        let id = match self.emails.get(&normalize_email(email)) {
            Some(id) => id.value().clone(),
            None => return Ok(None),
        };
        self.find_user_by_id(&id).await
    }

    async fn find_user_by_id(&self, id: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.users.get(id).map(|u| u.value().clone()))
    }

    async fn update_user(&self, id: &str, update: &ProfileUpdate) -> AppResult<UserRecord> {
        let mut user = self
            .users
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        update.apply(user.value_mut());
        Ok(user.value().clone())
    }

    async fn add_entry(&self, list: ListKind, entry: &LibraryEntry) -> AppResult<()> {
        let mut user_list = self
            .lists
            .entry((list, entry.user_id.clone()))
            .or_default();

        match user_list.entry(entry.key().field()) {
            Entry::Occupied(_) => Err(AppError::DuplicateEntry(format!(
                "{} already exists",
                list.label()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(entry.clone());
                Ok(())
            }
        }
    }

    async fn remove_entry(&self, list: ListKind, key: &EntryKey) -> AppResult<()> {
        let removed = self
            .lists
            .get_mut(&(list, key.user_id.clone()))
            .and_then(|mut l| l.remove(&key.field()));

        match removed {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!("{} not found", list.label()))),
        }
    }

    async fn list_entries(
        &self,
        list: ListKind,
        user_id: &str,
        filter: &EntryFilter,
    ) -> AppResult<Vec<LibraryEntry>> {
        let mut entries: Vec<LibraryEntry> = self
            .lists
            .get(&(list, user_id.to_string()))
            .map(|l| l.values().filter(|e| filter.matches(e)).cloned().collect())
            .unwrap_or_default();

        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}

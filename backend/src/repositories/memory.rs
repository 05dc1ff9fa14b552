//! In-memory account store
//!
//! Mirrors the PostgreSQL store's observable behaviour: unique username and
//! email, and all-or-nothing cascading delete. Every operation holds one lock
//! for its whole duration, so concurrent callers never see a half-applied
//! cascade. Used by the router and service tests.

use super::account::{AccountChanges, AccountRecord, AccountStore, CascadeSummary, NewAccount};
use super::{CascadeStep, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
struct OwnedThread {
    user_id: Uuid,
}

#[derive(Debug, Clone, Copy)]
struct OwnedComment {
    user_id: Uuid,
    thread_id: Uuid,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    accounts: HashMap<Uuid, AccountRecord>,
    threads: HashMap<Uuid, OwnedThread>,
    comments: HashMap<Uuid, OwnedComment>,
}

impl Tables {
    fn holder_of(&self, username: Option<&str>, email: Option<&str>, except: Option<Uuid>) -> Option<&'static str> {
        for account in self.accounts.values() {
            if Some(account.id) == except {
                continue;
            }
            if email.is_some_and(|e| e == account.email) {
                return Some("email");
            }
            if username.is_some_and(|u| u == account.username) {
                return Some("username");
            }
        }
        None
    }
}

/// In-memory [`AccountStore`] with minimal thread/comment bookkeeping
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    tables: Mutex<Tables>,
    fail_cascade_at: Mutex<Option<CascadeStep>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a thread owned by `user_id`
    pub async fn add_thread(&self, user_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.tables
            .lock()
            .await
            .threads
            .insert(id, OwnedThread { user_id });
        id
    }

    /// Record a comment by `user_id` on `thread_id`
    pub async fn add_comment(&self, user_id: Uuid, thread_id: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.tables
            .lock()
            .await
            .comments
            .insert(id, OwnedComment { user_id, thread_id });
        id
    }

    pub async fn threads_owned_by(&self, user_id: Uuid) -> usize {
        let tables = self.tables.lock().await;
        tables.threads.values().filter(|t| t.user_id == user_id).count()
    }

    pub async fn comments_owned_by(&self, user_id: Uuid) -> usize {
        let tables = self.tables.lock().await;
        tables.comments.values().filter(|c| c.user_id == user_id).count()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.lock().await.comments.len()
    }

    /// Make the next cascading delete fail at `step`
    pub async fn fail_cascade_at(&self, step: CascadeStep) {
        *self.fail_cascade_at.lock().await = Some(step);
    }
}

fn injected_failure(step: CascadeStep) -> StoreError {
    StoreError::Cascade {
        step,
        source: sqlx::Error::Protocol(format!("injected failure at {step}")),
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, StoreError> {
        Ok(self.tables.lock().await.accounts.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.accounts.values().find(|a| a.username == username).cloned())
    }

    async fn list(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let tables = self.tables.lock().await;
        let mut accounts: Vec<_> = tables.accounts.values().cloned().collect();
        accounts.sort_by_key(|a| a.created_at);
        Ok(accounts)
    }

    async fn create(&self, account: NewAccount) -> Result<AccountRecord, StoreError> {
        let mut tables = self.tables.lock().await;
        if let Some(field) = tables.holder_of(Some(&account.username), Some(&account.email), None) {
            return Err(StoreError::Conflict(field.to_string()));
        }

        let now = Utc::now();
        let record = AccountRecord {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let mut tables = self.tables.lock().await;
        if !tables.accounts.contains_key(&id) {
            return Ok(None);
        }
        if let Some(field) =
            tables.holder_of(changes.username.as_deref(), changes.email.as_deref(), Some(id))
        {
            return Err(StoreError::Conflict(field.to_string()));
        }

        let Some(record) = tables.accounts.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(username) = changes.username {
            record.username = username;
        }
        if let Some(email) = changes.email {
            record.email = email;
        }
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<Option<CascadeSummary>, StoreError> {
        let fail_at = self.fail_cascade_at.lock().await.take();
        let mut tables = self.tables.lock().await;

        // Work on a copy and swap it in only when every step succeeded
        let mut staged = tables.clone();

        if fail_at == Some(CascadeStep::Comments) {
            return Err(injected_failure(CascadeStep::Comments));
        }
        let before = staged.comments.len();
        staged.comments.retain(|_, c| c.user_id != id);
        let comments_deleted = (before - staged.comments.len()) as u64;

        if fail_at == Some(CascadeStep::Threads) {
            return Err(injected_failure(CascadeStep::Threads));
        }
        let owned_threads: Vec<Uuid> = staged
            .threads
            .iter()
            .filter(|(_, t)| t.user_id == id)
            .map(|(thread_id, _)| *thread_id)
            .collect();
        for thread_id in &owned_threads {
            staged.threads.remove(thread_id);
        }
        staged
            .comments
            .retain(|_, c| !owned_threads.contains(&c.thread_id));

        if fail_at == Some(CascadeStep::Account) {
            return Err(injected_failure(CascadeStep::Account));
        }
        if staged.accounts.remove(&id).is_none() {
            return Ok(None);
        }

        *tables = staged;
        Ok(Some(CascadeSummary {
            comments_deleted,
            threads_deleted: owned_threads.len() as u64,
        }))
    }
}

//! Account storage
//!
//! [`AccountStore`] is the storage capability the account service works
//! against. [`PgAccountStore`] is the PostgreSQL implementation; tests use
//! [`super::InMemoryAccountStore`].

use super::{CascadeStep, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use forum_shared::Account;
use sqlx::{PgPool, Postgres, Transaction};
use std::fmt;
use tracing::{info, warn};
use uuid::Uuid;

/// Account record from database
#[derive(Clone, sqlx::FromRow)]
pub struct AccountRecord {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRecord> for Account {
    fn from(record: AccountRecord) -> Self {
        Account {
            id: record.id,
            username: record.username,
            email: record.email,
            created_at: record.created_at,
        }
    }
}

/// Input for creating an account
#[derive(Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

const REDACTED: &str = "[REDACTED]";

impl fmt::Debug for AccountRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRecord")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &REDACTED)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password_hash", &REDACTED)
            .finish()
    }
}

/// Input for a partial account update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub username: Option<String>,
    pub email: Option<String>,
}

/// Rows removed by a cascading delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeSummary {
    pub comments_deleted: u64,
    pub threads_deleted: u64,
}

/// Storage capability for accounts
///
/// Uniqueness of username and email is enforced here, by the store, and
/// reported as [`StoreError::Conflict`].
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>, StoreError>;

    async fn list(&self) -> Result<Vec<AccountRecord>, StoreError>;

    async fn create(&self, account: NewAccount) -> Result<AccountRecord, StoreError>;

    /// Returns `None` when no account has this id
    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<AccountRecord>, StoreError>;

    /// Delete the account with every comment and thread it owns, atomically
    ///
    /// Returns `None` (with nothing deleted) when no account has this id.
    async fn delete_cascade(&self, id: Uuid) -> Result<Option<CascadeSummary>, StoreError>;
}

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, created_at, updated_at";

/// PostgreSQL-backed account store
#[derive(Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<AccountRecord>, StoreError> {
        let sql = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE {column} = $1");
        let account = sqlx::query_as::<_, AccountRecord>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    async fn cascade_steps(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<Option<CascadeSummary>, StoreError> {
        let comments_deleted = sqlx::query("DELETE FROM comments WHERE user_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|source| StoreError::Cascade {
                step: CascadeStep::Comments,
                source,
            })?
            .rows_affected();

        // Other accounts' comments on these threads and the thread_tags rows
        // go with them through ON DELETE CASCADE.
        let threads_deleted = sqlx::query("DELETE FROM threads WHERE user_id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|source| StoreError::Cascade {
                step: CascadeStep::Threads,
                source,
            })?
            .rows_affected();

        let accounts_deleted = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await
            .map_err(|source| StoreError::Cascade {
                step: CascadeStep::Account,
                source,
            })?
            .rows_affected();

        if accounts_deleted == 0 {
            return Ok(None);
        }

        Ok(Some(CascadeSummary {
            comments_deleted,
            threads_deleted,
        }))
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, StoreError> {
        let account = sqlx::query_as::<_, AccountRecord>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StoreError> {
        self.find_one("email", email).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<AccountRecord>, StoreError> {
        self.find_one("username", username).await
    }

    async fn list(&self) -> Result<Vec<AccountRecord>, StoreError> {
        let accounts = sqlx::query_as::<_, AccountRecord>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(accounts)
    }

    async fn create(&self, account: NewAccount) -> Result<AccountRecord, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(&format!(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write)?;

        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: AccountChanges,
    ) -> Result<Option<AccountRecord>, StoreError> {
        let record = sqlx::query_as::<_, AccountRecord>(&format!(
            r#"
            UPDATE accounts SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_write)?;

        Ok(record)
    }

    async fn delete_cascade(&self, id: Uuid) -> Result<Option<CascadeSummary>, StoreError> {
        let mut tx = self.pool.begin().await?;

        match Self::cascade_steps(&mut tx, id).await {
            Ok(Some(summary)) => {
                tx.commit().await?;
                info!(
                    account_id = %id,
                    threads = summary.threads_deleted,
                    comments = summary.comments_deleted,
                    "Account deleted with owned content"
                );
                Ok(Some(summary))
            }
            Ok(None) => {
                tx.rollback().await?;
                Ok(None)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(account_id = %id, error = %rollback_err, "Rollback after failed cascade also failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_to_account_drops_hash() {
        let record = AccountRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let account: Account = record.clone().into();
        let json = serde_json::to_string(&account).unwrap();

        assert_eq!(account.id, record.id);
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2"));
    }

    #[test]
    fn test_debug_output_redacts_hash() {
        let record = AccountRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let new_account = NewAccount {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
        };

        for output in [format!("{record:?}"), format!("{new_account:?}")] {
            assert!(!output.contains("argon2id"));
            assert!(output.contains("[REDACTED]"));
            assert!(output.contains("alice@example.com"));
        }
    }
}

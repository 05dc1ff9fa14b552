//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod account;
pub mod forum;
pub mod memory;

use std::fmt;
use thiserror::Error;

pub use account::{
    AccountChanges, AccountRecord, AccountStore, CascadeSummary, NewAccount, PgAccountStore,
};
pub use forum::{
    CategoryRecord, CategoryRepository, CommentRecord, CommentRepository, NewThread, TagRecord,
    TagRepository, ThreadRecord, ThreadRepository,
};
pub use memory::InMemoryAccountStore;

/// Stage of a cascading account deletion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    Comments,
    Threads,
    Account,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let step = match self {
            CascadeStep::Comments => "delete comments",
            CascadeStep::Threads => "delete threads",
            CascadeStep::Account => "delete account",
        };
        f.write_str(step)
    }
}

/// Storage failures surfaced by repositories
#[derive(Error, Debug)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write; carries the column name
    #[error("{0} already exists")]
    Conflict(String),

    /// A foreign key pointed at a row that does not exist
    #[error("referenced {0} does not exist")]
    MissingReference(String),

    /// Cascading delete failed and was rolled back
    #[error("cascading delete failed at step '{step}'")]
    Cascade {
        step: CascadeStep,
        #[source]
        source: sqlx::Error,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Translate constraint violations into domain errors
    ///
    /// Constraint names are the PostgreSQL defaults produced by the
    /// migrations.
    pub(crate) fn from_write(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default();
            if db_err.is_unique_violation() {
                return StoreError::Conflict(constraint_subject(constraint).to_string());
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::MissingReference(constraint_subject(constraint).to_string());
            }
        }
        StoreError::Database(err)
    }
}

fn constraint_subject(constraint: &str) -> &'static str {
    match constraint {
        "accounts_email_key" => "email",
        "accounts_username_key" => "username",
        "categories_name_key" | "threads_category_id_fkey" => "category",
        "tags_name_key" | "thread_tags_tag_id_fkey" => "tag",
        "comments_thread_id_fkey" | "thread_tags_thread_id_fkey" => "thread",
        "threads_user_id_fkey" | "comments_user_id_fkey" => "account",
        _ => "record",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_subject() {
        assert_eq!(constraint_subject("accounts_email_key"), "email");
        assert_eq!(constraint_subject("accounts_username_key"), "username");
        assert_eq!(constraint_subject("threads_category_id_fkey"), "category");
        assert_eq!(constraint_subject("thread_tags_tag_id_fkey"), "tag");
        assert_eq!(constraint_subject("comments_thread_id_fkey"), "thread");
        assert_eq!(constraint_subject("unknown"), "record");
    }

    #[test]
    fn test_cascade_step_display() {
        assert_eq!(CascadeStep::Comments.to_string(), "delete comments");
        assert_eq!(CascadeStep::Account.to_string(), "delete account");
    }
}

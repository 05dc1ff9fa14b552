//! Forum content repositories: threads, comments, categories and tags

use super::StoreError;
use chrono::{DateTime, Utc};
use forum_shared::{Category, Comment, Tag, Thread};
use sqlx::PgPool;
use uuid::Uuid;

// ============================================================================
// Records
// ============================================================================

/// Thread record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ThreadRecord {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ThreadRecord> for Thread {
    fn from(r: ThreadRecord) -> Self {
        Thread {
            id: r.id,
            title: r.title,
            content: r.content,
            user_id: r.user_id,
            category_id: r.category_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Comment record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CommentRecord {
    pub id: Uuid,
    pub thread_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRecord> for Comment {
    fn from(r: CommentRecord) -> Self {
        Comment {
            id: r.id,
            thread_id: r.thread_id,
            user_id: r.user_id,
            content: r.content,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Category record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<CategoryRecord> for Category {
    fn from(r: CategoryRecord) -> Self {
        Category {
            id: r.id,
            name: r.name,
            created_at: r.created_at,
        }
    }
}

/// Tag record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TagRecord {
    pub id: Uuid,
    pub name: String,
}

impl From<TagRecord> for Tag {
    fn from(r: TagRecord) -> Self {
        Tag {
            id: r.id,
            name: r.name,
        }
    }
}

/// Input for creating a thread
#[derive(Debug, Clone)]
pub struct NewThread {
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub category_id: Option<Uuid>,
    pub tag_ids: Vec<Uuid>,
}

// ============================================================================
// Threads
// ============================================================================

pub struct ThreadRepository;

impl ThreadRepository {
    /// Create a thread and its tag links in one transaction
    pub async fn create(pool: &PgPool, thread: NewThread) -> Result<ThreadRecord, StoreError> {
        let mut tx = pool.begin().await?;

        let record = sqlx::query_as::<_, ThreadRecord>(
            r#"
            INSERT INTO threads (title, content, user_id, category_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, content, user_id, category_id, created_at, updated_at
            "#,
        )
        .bind(&thread.title)
        .bind(&thread.content)
        .bind(thread.user_id)
        .bind(thread.category_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(StoreError::from_write)?;

        for tag_id in &thread.tag_ids {
            sqlx::query(
                r#"
                INSERT INTO thread_tags (thread_id, tag_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(record.id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(StoreError::from_write)?;
        }

        tx.commit().await?;

        Ok(record)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<ThreadRecord>, StoreError> {
        let threads = sqlx::query_as::<_, ThreadRecord>(
            r#"
            SELECT id, title, content, user_id, category_id, created_at, updated_at
            FROM threads
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(threads)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<ThreadRecord>, StoreError> {
        let thread = sqlx::query_as::<_, ThreadRecord>(
            r#"
            SELECT id, title, content, user_id, category_id, created_at, updated_at
            FROM threads
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(thread)
    }

    pub async fn tags_for(pool: &PgPool, thread_id: Uuid) -> Result<Vec<TagRecord>, StoreError> {
        let tags = sqlx::query_as::<_, TagRecord>(
            r#"
            SELECT t.id, t.name
            FROM tags t
            JOIN thread_tags tt ON tt.tag_id = t.id
            WHERE tt.thread_id = $1
            ORDER BY t.name
            "#,
        )
        .bind(thread_id)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }

    /// Delete a thread; its comments and tag links cascade
    ///
    /// Returns whether a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Comments
// ============================================================================

pub struct CommentRepository;

impl CommentRepository {
    pub async fn create(
        pool: &PgPool,
        thread_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<CommentRecord, StoreError> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            INSERT INTO comments (thread_id, user_id, content)
            VALUES ($1, $2, $3)
            RETURNING id, thread_id, user_id, content, created_at, updated_at
            "#,
        )
        .bind(thread_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_write)?;

        Ok(comment)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<CommentRecord>, StoreError> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, thread_id, user_id, content, created_at, updated_at
            FROM comments
            ORDER BY created_at
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    pub async fn list_by_thread(
        pool: &PgPool,
        thread_id: Uuid,
    ) -> Result<Vec<CommentRecord>, StoreError> {
        let comments = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, thread_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE thread_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(thread_id)
        .fetch_all(pool)
        .await?;

        Ok(comments)
    }

    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<CommentRecord>, StoreError> {
        let comment = sqlx::query_as::<_, CommentRecord>(
            r#"
            SELECT id, thread_id, user_id, content, created_at, updated_at
            FROM comments
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(comment)
    }

    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Categories and Tags
// ============================================================================

pub struct CategoryRepository;

impl CategoryRepository {
    pub async fn create(pool: &PgPool, name: &str) -> Result<CategoryRecord, StoreError> {
        let category = sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_write)?;

        Ok(category)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<CategoryRecord>, StoreError> {
        let categories = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, name, created_at FROM categories ORDER BY name",
        )
        .fetch_all(pool)
        .await?;

        Ok(categories)
    }
}

pub struct TagRepository;

impl TagRepository {
    pub async fn create(pool: &PgPool, name: &str) -> Result<TagRecord, StoreError> {
        let tag = sqlx::query_as::<_, TagRecord>(
            r#"
            INSERT INTO tags (name)
            VALUES ($1)
            RETURNING id, name
            "#,
        )
        .bind(name)
        .fetch_one(pool)
        .await
        .map_err(StoreError::from_write)?;

        Ok(tag)
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<TagRecord>, StoreError> {
        let tags = sqlx::query_as::<_, TagRecord>("SELECT id, name FROM tags ORDER BY name")
            .fetch_all(pool)
            .await?;

        Ok(tags)
    }
}

//! Forum content service: threads, comments, categories and tags
//!
//! Authorship always comes from the verified session, never from the
//! request body. Only the author may delete a thread or comment.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::repositories::{
    CategoryRepository, CommentRepository, NewThread, TagRepository, ThreadRepository,
};
use forum_shared::validation::{validate_text, MAX_NAME_LEN, MAX_TITLE_LEN};
use forum_shared::{
    Category, Comment, CreateCategoryRequest, CreateCommentRequest, CreateTagRequest,
    CreateThreadRequest, Tag, Thread, ThreadDetail,
};
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

pub struct ForumService;

impl ForumService {
    // ------------------------------------------------------------------
    // Threads
    // ------------------------------------------------------------------

    pub async fn create_thread(
        pool: &PgPool,
        author: &AuthUser,
        req: CreateThreadRequest,
    ) -> Result<Thread, ApiError> {
        let title = req.title.trim().to_string();
        validate_text("Title", &title, Some(MAX_TITLE_LEN))?;
        validate_text("Content", &req.content, None)?;

        let record = ThreadRepository::create(
            pool,
            NewThread {
                title,
                content: req.content,
                user_id: author.account_id,
                category_id: req.category_id,
                tag_ids: req.tag_ids,
            },
        )
        .await?;

        info!(thread_id = %record.id, account_id = %author.account_id, "Thread created");
        Ok(record.into())
    }

    pub async fn list_threads(pool: &PgPool) -> Result<Vec<Thread>, ApiError> {
        let threads = ThreadRepository::list(pool).await?;
        Ok(threads.into_iter().map(Thread::from).collect())
    }

    /// Thread with its tags
    pub async fn get_thread(pool: &PgPool, id: Uuid) -> Result<ThreadDetail, ApiError> {
        let thread = ThreadRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Thread not found".to_string()))?;
        let tags = ThreadRepository::tags_for(pool, id).await?;

        Ok(ThreadDetail {
            thread: thread.into(),
            tags: tags.into_iter().map(Tag::from).collect(),
        })
    }

    pub async fn delete_thread(pool: &PgPool, caller: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let thread = ThreadRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Thread not found".to_string()))?;
        caller.ensure_owner(thread.user_id)?;

        if !ThreadRepository::delete(pool, id).await? {
            return Err(ApiError::NotFound("Thread not found".to_string()));
        }

        info!(thread_id = %id, "Thread deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Comments
    // ------------------------------------------------------------------

    pub async fn create_comment(
        pool: &PgPool,
        author: &AuthUser,
        req: CreateCommentRequest,
    ) -> Result<Comment, ApiError> {
        validate_text("Content", &req.content, None)?;

        let record =
            CommentRepository::create(pool, req.thread_id, author.account_id, &req.content).await?;

        info!(comment_id = %record.id, thread_id = %record.thread_id, "Comment created");
        Ok(record.into())
    }

    pub async fn list_comments(pool: &PgPool) -> Result<Vec<Comment>, ApiError> {
        let comments = CommentRepository::list(pool).await?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    pub async fn comments_for_thread(pool: &PgPool, thread_id: Uuid) -> Result<Vec<Comment>, ApiError> {
        let comments = CommentRepository::list_by_thread(pool, thread_id).await?;
        Ok(comments.into_iter().map(Comment::from).collect())
    }

    pub async fn delete_comment(pool: &PgPool, caller: &AuthUser, id: Uuid) -> Result<(), ApiError> {
        let comment = CommentRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;
        caller.ensure_owner(comment.user_id)?;

        if !CommentRepository::delete(pool, id).await? {
            return Err(ApiError::NotFound("Comment not found".to_string()));
        }

        info!(comment_id = %id, "Comment deleted");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Categories and tags
    // ------------------------------------------------------------------

    pub async fn create_category(pool: &PgPool, req: CreateCategoryRequest) -> Result<Category, ApiError> {
        let name = req.name.trim();
        validate_text("Name", name, Some(MAX_NAME_LEN))?;
        Ok(CategoryRepository::create(pool, name).await?.into())
    }

    pub async fn list_categories(pool: &PgPool) -> Result<Vec<Category>, ApiError> {
        let categories = CategoryRepository::list(pool).await?;
        Ok(categories.into_iter().map(Category::from).collect())
    }

    pub async fn create_tag(pool: &PgPool, req: CreateTagRequest) -> Result<Tag, ApiError> {
        let name = req.name.trim();
        validate_text("Name", name, Some(MAX_NAME_LEN))?;
        Ok(TagRepository::create(pool, name).await?.into())
    }

    pub async fn list_tags(pool: &PgPool) -> Result<Vec<Tag>, ApiError> {
        let tags = TagRepository::list(pool).await?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }
}

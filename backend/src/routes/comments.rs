//! Comment routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::services::ForumService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use forum_shared::{Comment, CreateCommentRequest, MessageResponse};
use uuid::Uuid;

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/create_comment", post(create_comment))
        .route("/get_comments", get(list_comments))
        .route("/get_comments/:thread_id", get(thread_comments))
        .route("/delete_comment/:id", delete(delete_comment))
}

/// POST /api/create_comment
async fn create_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    let comment = ForumService::create_comment(state.db(), &auth_user, req).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// GET /api/get_comments
async fn list_comments(State(state): State<AppState>) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(ForumService::list_comments(state.db()).await?))
}

/// GET /api/get_comments/:thread_id
async fn thread_comments(
    State(state): State<AppState>,
    ApiPath(thread_id): ApiPath<Uuid>,
) -> ApiResult<Json<Vec<Comment>>> {
    Ok(Json(ForumService::comments_for_thread(state.db(), thread_id).await?))
}

/// DELETE /api/delete_comment/:id
async fn delete_comment(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    ForumService::delete_comment(state.db(), &auth_user, id).await?;
    Ok(Json(MessageResponse::new("Comment deleted successfully")))
}

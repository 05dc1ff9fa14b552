//! Thread routes

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
use forum_shared::{CreateThreadRequest, MessageResponse, Thread, ThreadDetail};
use uuid::Uuid;

pub fn thread_routes() -> Router<AppState> {
    Router::new()
        .route("/create_thread", post(create_thread))
        .route("/get_threads", get(list_threads))
        .route("/get_thread/:id", get(get_thread))
        .route("/delete_thread/:id", delete(delete_thread))
}

/// POST /api/create_thread
///
/// The author is the authenticated caller.
async fn create_thread(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let thread = ForumService::create_thread(state.db(), &auth_user, req).await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

/// GET /api/get_threads
async fn list_threads(State(state): State<AppState>) -> ApiResult<Json<Vec<Thread>>> {
    Ok(Json(ForumService::list_threads(state.db()).await?))
}

/// GET /api/get_thread/:id
async fn get_thread(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<ThreadDetail>> {
    Ok(Json(ForumService::get_thread(state.db(), id).await?))
}

/// DELETE /api/delete_thread/:id
async fn delete_thread(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<MessageResponse>> {
    ForumService::delete_thread(state.db(), &auth_user, id).await?;
    Ok(Json(MessageResponse::new("Thread deleted successfully")))
}

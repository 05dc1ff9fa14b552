//! Category and tag routes

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::services::ForumService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use forum_shared::{Category, CreateCategoryRequest, CreateTagRequest, Tag};

pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/create_category", post(create_category))
        .route("/get_categories", get(list_categories))
        .route("/create_tag", post(create_tag))
        .route("/get_tags", get(list_tags))
}

/// POST /api/create_category
async fn create_category(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateCategoryRequest>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let category = ForumService::create_category(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/get_categories
async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(ForumService::list_categories(state.db()).await?))
}

/// POST /api/create_tag
async fn create_tag(
    State(state): State<AppState>,
    _auth_user: AuthUser,
    ApiJson(req): ApiJson<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    let tag = ForumService::create_tag(state.db(), req).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// GET /api/get_tags
async fn list_tags(State(state): State<AppState>) -> ApiResult<Json<Vec<Tag>>> {
    Ok(Json(ForumService::list_tags(state.db()).await?))
}

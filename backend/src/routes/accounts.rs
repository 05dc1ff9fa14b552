//! Account routes
//!
//! Signup, login, profile lookup, update and cascading delete, plus the
//! protected route used by clients to check a stored token.
//!
//! Update and delete act on the caller's own account only.

use crate::auth::{require_auth, AuthUser};
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::services::AccountService;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use forum_shared::{
    Account, DeleteAccountResponse, LoginRequest, LoginResponse, SignupRequest, SignupResponse,
    UpdateAccountRequest,
};
use serde::Serialize;
use uuid::Uuid;

/// Create account routes
pub fn account_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/protected", get(protected))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/get_users", get(list_users))
        .route("/get_user/:id", get(get_user))
        .route("/users/:id", put(update_user))
        .route("/delete_user/:id", delete(delete_user))
        .merge(protected)
}

/// POST /api/signup
async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<SignupResponse>)> {
    let user = AccountService::signup(state.accounts(), req).await?;
    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user,
        }),
    ))
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let response = AccountService::login(state.accounts(), state.jwt(), req).await?;
    Ok(Json(response))
}

/// GET /api/get_users
async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<Account>>> {
    let users = AccountService::list(state.accounts()).await?;
    Ok(Json(users))
}

/// GET /api/get_user/:id
async fn get_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Account>> {
    let user = AccountService::get(state.accounts(), id).await?;
    Ok(Json(user))
}

/// PUT /api/users/:id
///
/// Requires a Bearer token for the same account.
async fn update_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<UpdateAccountRequest>,
) -> ApiResult<Json<Account>> {
    auth_user.ensure_owner(id)?;
    let user = AccountService::update(state.accounts(), id, req).await?;
    Ok(Json(user))
}

/// DELETE /api/delete_user/:id
///
/// Removes the account with all its threads and comments in one transaction.
async fn delete_user(
    State(state): State<AppState>,
    auth_user: AuthUser,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<DeleteAccountResponse>> {
    auth_user.ensure_owner(id)?;
    let response = AccountService::delete(state.accounts(), id).await?;
    Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ProtectedResponse {
    message: String,
    user_id: Uuid,
    username: String,
}

/// GET /api/protected
async fn protected(Extension(user): Extension<AuthUser>) -> Json<ProtectedResponse> {
    Json(ProtectedResponse {
        message: "This is a protected route".to_string(),
        user_id: user.account_id,
        username: user.username,
    })
}

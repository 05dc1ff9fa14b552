//! Authentication middleware
//!
//! Two forms of the same gate: the [`AuthUser`] extractor for individual
//! handlers and [`require_auth`] for whole route groups. Both fail closed and
//! both hand the verified claims to the handler, so nothing downstream
//! re-parses the token.

use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    extract::{FromRef, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use super::jwt::{Claims, JwtService};

/// Authenticated account extracted from a verified session token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub account_id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            account_id: claims.sub,
            username: claims.username,
            email: claims.email,
        }
    }
}

impl AuthUser {
    /// Reject unless the caller owns the resource
    pub fn ensure_owner(&self, owner_id: Uuid) -> Result<(), ApiError> {
        if self.account_id != owner_id {
            return Err(ApiError::Forbidden(
                "You can only modify your own resources".to_string(),
            ));
        }
        Ok(())
    }
}

/// Verify the bearer credential carried in `headers`
pub fn authenticate(headers: &HeaderMap, jwt: &JwtService) -> Result<AuthUser, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid token".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Unauthorized("Missing or invalid token".to_string()))?;

    let claims = jwt.verify(token).map_err(|e| {
        debug!(reason = %e, "Rejected session token");
        ApiError::Unauthorized("Invalid token".to_string())
    })?;

    Ok(claims.into())
}

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Already verified by `require_auth` on this route
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let app_state = AppState::from_ref(state);
        authenticate(&parts.headers, app_state.jwt())
    }
}

/// Route-group gate
///
/// Apply with `axum::middleware::from_fn_with_state`. On success the
/// verified [`AuthUser`] is stored in the request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = authenticate(request.headers(), state.jwt())?;
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

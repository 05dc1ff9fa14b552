//! Account lifecycle: signup, login, profile update and cascading delete
//!
//! Password hashing and verification run on the blocking thread pool.
//! Uniqueness is checked up front for a friendly error, but the store's
//! constraint is what actually guarantees it; a racing signup that slips
//! past the check still comes back as `Conflict`.

use crate::auth::{JwtService, PasswordService};
use crate::error::ApiError;
use crate::repositories::{AccountChanges, AccountStore, NewAccount};
use forum_shared::validation::{normalize_email, validate_email, validate_signup, validate_username};
use forum_shared::{
    Account, DeleteAccountResponse, LoginRequest, LoginResponse, SignupRequest,
    UpdateAccountRequest,
};
use tracing::{info, warn};
use uuid::Uuid;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Account service
pub struct AccountService;

impl AccountService {
    /// Register a new account
    pub async fn signup(store: &dyn AccountStore, req: SignupRequest) -> Result<Account, ApiError> {
        let username = req.username.trim().to_string();
        let email = normalize_email(&req.email);

        validate_signup(&username, &email, &req.password)?;

        if store.find_by_email(&email).await?.is_some() {
            return Err(ApiError::Conflict("Email already in use".to_string()));
        }
        if store.find_by_username(&username).await?.is_some() {
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }

        let password_hash = PasswordService::hash_async(req.password).await?;

        let record = store
            .create(NewAccount {
                username,
                email,
                password_hash,
            })
            .await?;

        info!(account_id = %record.id, username = %record.username, "Account created");
        Ok(record.into())
    }

    /// Authenticate with email and password and issue a session token
    ///
    /// Unknown email and wrong password produce the same error.
    pub async fn login(
        store: &dyn AccountStore,
        jwt: &JwtService,
        req: LoginRequest,
    ) -> Result<LoginResponse, ApiError> {
        let email = normalize_email(&req.email);
        if email.is_empty() || req.password.is_empty() {
            return Err(ApiError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let Some(account) = store.find_by_email(&email).await? else {
            // Same hashing cost as a wrong password
            PasswordService::verify_decoy_async(req.password).await?;
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let valid = PasswordService::verify_async(req.password, account.password_hash.clone()).await?;
        if !valid {
            warn!(account_id = %account.id, "Failed login attempt");
            return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = jwt
            .issue(account.id, &account.username, &account.email)
            .map_err(|e| ApiError::Internal(e.into()))?;

        info!(account_id = %account.id, "Login successful");
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            token_type: "Bearer".to_string(),
            expires_in: jwt.expires_in_secs(),
            user: account.into(),
        })
    }

    /// Apply a partial update; empty fields are ignored
    ///
    /// An unknown id is `NotFound` before any uniqueness check runs.
    pub async fn update(
        store: &dyn AccountStore,
        id: Uuid,
        req: UpdateAccountRequest,
    ) -> Result<Account, ApiError> {
        if store.find_by_id(id).await?.is_none() {
            return Err(ApiError::NotFound("User not found".to_string()));
        }

        let username = req
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let email = req
            .email
            .map(|e| normalize_email(&e))
            .filter(|e| !e.is_empty());

        if let Some(username) = &username {
            validate_username(username)?;
        }
        if let Some(email) = &email {
            validate_email(email)?;
        }

        if let Some(email) = &email {
            if let Some(holder) = store.find_by_email(email).await? {
                if holder.id != id {
                    return Err(ApiError::Conflict("Email already in use".to_string()));
                }
            }
        }
        if let Some(username) = &username {
            if let Some(holder) = store.find_by_username(username).await? {
                if holder.id != id {
                    return Err(ApiError::Conflict("Username already taken".to_string()));
                }
            }
        }

        let record = store
            .update(id, AccountChanges { username, email })
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        info!(account_id = %id, "Account updated");
        Ok(record.into())
    }

    /// Delete an account together with its threads and comments
    pub async fn delete(store: &dyn AccountStore, id: Uuid) -> Result<DeleteAccountResponse, ApiError> {
        let summary = store
            .delete_cascade(id)
            .await?
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

        Ok(DeleteAccountResponse {
            message: "User, threads, and comments deleted successfully".to_string(),
            threads_deleted: summary.threads_deleted,
            comments_deleted: summary.comments_deleted,
        })
    }

    pub async fn get(store: &dyn AccountStore, id: Uuid) -> Result<Account, ApiError> {
        store
            .find_by_id(id)
            .await?
            .map(Account::from)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    pub async fn list(store: &dyn AccountStore) -> Result<Vec<Account>, ApiError> {
        Ok(store.list().await?.into_iter().map(Account::from).collect())
    }
}

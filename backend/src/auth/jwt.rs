//! Session token issuance and validation
//!
//! Tokens are HMAC-signed JWTs with a fixed 24 hour lifetime. Validation is
//! stateless: signature, algorithm family and expiry are checked, the store is
//! never consulted, so claims can lag behind later profile edits.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Lifetime of every issued token
pub const TOKEN_LIFETIME_HOURS: i64 = 24;

const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID)
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token failures
///
/// Callers at the HTTP boundary collapse all of these into one
/// uninformative 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token signature does not match")]
    InvalidSignature,

    #[error("token is not signed with an HMAC algorithm")]
    UnexpectedAlgorithm,

    #[error("malformed token: {0}")]
    Malformed(String),

    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::UnexpectedAlgorithm
            }
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Pre-computed JWT keys
///
/// Derived once from the configured secret and shared behind `Arc`.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl JwtKeys {
    pub fn new(secret: &SecretString) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: Arc::new(EncodingKey::from_secret(bytes)),
            decoding: Arc::new(DecodingKey::from_secret(bytes)),
        }
    }
}

/// JWT service for token operations
///
/// Create once at startup and keep in `AppState`; cloning is cheap.
#[derive(Clone)]
pub struct JwtService {
    keys: JwtKeys,
    validation: Arc<Validation>,
}

impl JwtService {
    pub fn new(secret: &SecretString) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            keys: JwtKeys::new(secret),
            validation: Arc::new(validation),
        }
    }

    /// Issue a token for an account, valid for 24 hours from now
    #[inline]
    pub fn issue(&self, account_id: Uuid, username: &str, email: &str) -> Result<String, TokenError> {
        self.issue_at(account_id, username, email, Utc::now())
    }

    /// Issue a token as if at `now`
    ///
    /// Identical inputs and time produce an identical token.
    pub fn issue_at(
        &self,
        account_id: Uuid,
        username: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let exp = now + Duration::hours(TOKEN_LIFETIME_HOURS);
        let claims = Claims {
            sub: account_id,
            username: username.to_string(),
            email: email.to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(SIGNING_ALGORITHM), &claims, &self.keys.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Validate a token and return its claims
    #[inline]
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.keys.decoding, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Token lifetime in seconds, as reported to clients
    #[inline]
    pub fn expires_in_secs(&self) -> i64 {
        TOKEN_LIFETIME_HOURS * 3600
    }
}

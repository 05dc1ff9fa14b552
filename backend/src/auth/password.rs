//! Password hashing using argon2
//!
//! New hashes are Argon2id PHC strings. Hashes carried over from the legacy
//! deployment are bcrypt (`$2a$`, `$2b$`, `$2y$`) and are still accepted by
//! [`PasswordService::verify`].
//!
//! # Performance Considerations
//!
//! Both algorithms are intentionally CPU-intensive. In async contexts use the
//! `*_async` variants, which run on the blocking thread pool.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;
use thiserror::Error;

// Stands in for the stored hash when no account matches, so a failed login
// costs one verification either way.
static DECOY_HASH: Lazy<Option<String>> =
    Lazy::new(|| PasswordService::hash("decoy-password-never-assigned").ok());

/// Credential hashing failures
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hashing(String),

    #[error("Stored password hash is malformed: {0}")]
    MalformedHash(String),

    #[error("Password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Password hashing service
pub struct PasswordService;

impl PasswordService {
    /// Hash a password with a fresh random salt (blocking operation)
    pub fn hash(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    /// Hash a password on the blocking thread pool
    pub async fn hash_async(password: String) -> Result<String, PasswordError> {
        tokio::task::spawn_blocking(move || Self::hash(&password)).await?
    }

    /// Verify a password against a stored hash (blocking operation)
    ///
    /// A mismatch is `Ok(false)`; only an unparseable hash is an error.
    pub fn verify(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if Self::is_legacy_hash(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| PasswordError::MalformedHash(e.to_string()));
        }

        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::MalformedHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password on the blocking thread pool
    pub async fn verify_async(password: String, hash: String) -> Result<bool, PasswordError> {
        tokio::task::spawn_blocking(move || Self::verify(&password, &hash)).await?
    }

    /// Run a full verification against a fixed hash and discard the outcome
    pub async fn verify_decoy_async(password: String) -> Result<(), PasswordError> {
        tokio::task::spawn_blocking(move || {
            if let Some(hash) = DECOY_HASH.as_deref() {
                let _ = Self::verify(&password, hash);
            }
        })
        .await?;
        Ok(())
    }

    fn is_legacy_hash(hash: &str) -> bool {
        hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$")
    }
}

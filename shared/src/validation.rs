//! Input validation functions
//!
//! The same rules run on the server and, through the WASM bindings,
//! in the browser before a form is submitted.

use crate::errors::ValidationError;
use once_cell::sync::Lazy;
use regex_lite::Regex;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MAX_USERNAME_LEN: usize = 50;
pub const MAX_EMAIL_LEN: usize = 255;
pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_NAME_LEN: usize = 64;

// local-part, '@', domain, TLD of at least two letters
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("email pattern is valid")
});

/// Canonical form used for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate email format
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::Empty("Email"));
    }
    if email.len() > MAX_EMAIL_LEN {
        return Err(ValidationError::EmailTooLong);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Validate password length
///
/// Length is counted in characters, not bytes.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LEN,
        });
    }
    if len > MAX_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() {
        return Err(ValidationError::Empty("Username"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(ValidationError::UsernameTooLong {
            max: MAX_USERNAME_LEN,
        });
    }
    Ok(())
}

/// Validate a full signup form
///
/// Empty fields are reported together before any format check runs.
pub fn validate_signup(username: &str, email: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password)
}

/// Validate free text such as a thread title or comment body
pub fn validate_text(field: &'static str, value: &str, max: Option<usize>) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    if let Some(max) = max {
        if value.chars().count() > max {
            return Err(ValidationError::TooLong { field, max });
        }
    }
    Ok(())
}

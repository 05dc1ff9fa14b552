//! Error types shared between the backend and browser bindings

use thiserror::Error;

/// Input validation failures
///
/// The `Display` text is what clients see, so keep it short and
/// user-correctable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Email too long")]
    EmailTooLong,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Password too long")]
    PasswordTooLong,

    #[error("Username must be at most {max} characters long")]
    UsernameTooLong { max: usize },

    #[error("{field} must be at most {max} characters long")]
    TooLong { field: &'static str, max: usize },
}

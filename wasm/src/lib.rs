//! Web Forum WASM Module
//!
//! Browser bindings for the signup form checks, so the client rejects the
//! same input the server would before a request is sent.

use forum_shared::validation;
use wasm_bindgen::prelude::*;

/// Whether `email` is an acceptable address after normalization
#[wasm_bindgen]
pub fn is_valid_email(email: &str) -> bool {
    validation::validate_email(&validation::normalize_email(email)).is_ok()
}

/// Check a signup form
///
/// Returns the first error message, or `None` when the form is acceptable.
#[wasm_bindgen]
pub fn validate_signup(username: &str, email: &str, password: &str) -> Option<String> {
    let email = validation::normalize_email(email);
    validation::validate_signup(username.trim(), &email, password)
        .err()
        .map(|e| e.to_string())
}

//! Request extractors that reject with [`ApiError`]
//!
//! Drop-in replacements for `Json` and `Path` so malformed bodies and
//! path parameters get the same `{"error": {...}}` body as every other
//! failure instead of axum's plain-text rejection.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Typed path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

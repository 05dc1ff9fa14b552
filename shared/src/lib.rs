//! Web Forum Shared Library
//!
//! This crate contains shared types, models, and validation rules used by
//! the backend and the WASM bindings.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::*;
pub use types::*;

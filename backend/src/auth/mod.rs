//! Authentication module
//!
//! Provides JWT session tokens, argon2 password hashing and the request gate.

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, JwtService, TokenError, TOKEN_LIFETIME_HOURS};
pub use middleware::{authenticate, require_auth, AuthUser};
pub use password::{PasswordError, PasswordService};

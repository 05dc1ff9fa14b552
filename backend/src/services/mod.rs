//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories, the password hasher and the token service.

pub mod account;
pub mod forum;

pub use account::AccountService;
pub use forum::ForumService;

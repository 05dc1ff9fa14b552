//! Application state management
//!
//! Shared resources passed to every handler through Axum's state
//! extraction. Everything here is built once at startup and read-only
//! afterwards; cloning only bumps reference counts.

use crate::auth::JwtService;
use crate::config::AppConfig;
use crate::repositories::{AccountStore, PgAccountStore};
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (forum content repositories)
    pub db: PgPool,
    /// Account storage capability
    pub accounts: Arc<dyn AccountStore>,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token service with keys derived from the configured secret
    pub jwt: JwtService,
}

impl AppState {
    /// Create state backed by PostgreSQL for accounts
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let accounts = Arc::new(PgAccountStore::new(db.clone()));
        Self::with_account_store(db, accounts, config)
    }

    /// Create state with an explicit account store
    pub fn with_account_store(db: PgPool, accounts: Arc<dyn AccountStore>, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.jwt.secret);

        Self {
            db,
            accounts,
            config: Arc::new(config),
            jwt,
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn accounts(&self) -> &dyn AccountStore {
        self.accounts.as_ref()
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }
}

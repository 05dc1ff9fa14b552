//! Database connection and pool management
//!
//! Connection pooling, embedded schema migrations and the readiness probe
//! query. The pool is created once at startup and shared through `AppState`.

use crate::config::DatabaseConfig;
use anyhow::{Context, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{info, warn};

/// Pool tuning applied on top of [`DatabaseConfig`]
#[derive(Debug, Clone)]
pub struct PoolTuning {
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            min_connections: 2,
            acquire_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),  // 10 minutes
            max_lifetime: Duration::from_secs(1800), // 30 minutes
        }
    }
}

/// Create a PostgreSQL connection pool with default tuning
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    create_pool_with_tuning(config, &PoolTuning::default()).await
}

/// Create a PostgreSQL connection pool
pub async fn create_pool_with_tuning(config: &DatabaseConfig, tuning: &PoolTuning) -> Result<PgPool> {
    let connect_options = PgConnectOptions::from_str(&config.url)
        .context("invalid database URL")?
        .application_name("web-forum");

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(tuning.min_connections.min(config.max_connections))
        .acquire_timeout(tuning.acquire_timeout)
        .idle_timeout(tuning.idle_timeout)
        .max_lifetime(tuning.max_lifetime)
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await?;

    info!(
        max = config.max_connections,
        min = tuning.min_connections,
        "Database pool created"
    );

    Ok(pool)
}

/// Apply the forum schema migrations from `backend/migrations`
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    info!("Database migrations completed successfully");
    Ok(())
}

/// Check database health
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "Database health check failed");
            e.into()
        })
}

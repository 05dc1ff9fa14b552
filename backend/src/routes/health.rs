//! Health check endpoints
//!
//! - /health: process is up and serving
//! - /health/ready: database reachable, 503 otherwise
//! - /health/live: liveness probe, never touches dependencies

use crate::{db, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: CheckStatus,
}

/// Status of an individual dependency
#[derive(Debug, Serialize)]
pub struct CheckStatus {
    pub healthy: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CheckStatus {
    fn from_result<E: std::fmt::Display>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                healthy: true,
                message: None,
            },
            Err(e) => Self {
                healthy: false,
                message: Some(e.to_string()),
            },
        }
    }
}

fn plain(status: &'static str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status,
        version: VERSION,
        checks: None,
    })
}

pub async fn health_check() -> Json<HealthResponse> {
    plain("healthy")
}

pub async fn readiness_check(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let database = CheckStatus::from_result(db::health_check(state.db()).await);
    let ready = database.healthy;

    let response = Json(HealthResponse {
        status: if ready { "ready" } else { "not_ready" },
        version: VERSION,
        checks: Some(HealthChecks { database }),
    });

    if ready {
        Ok(response)
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, response))
    }
}

pub async fn liveness_check() -> Json<HealthResponse> {
    plain("alive")
}

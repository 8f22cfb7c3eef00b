//! Health check endpoints.
//!
//! Live outside the versioned API tree so probes are never rate
//! limited or authenticated.

use crate::{responses::ApiResponse, state::AppState};
use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Readiness check response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Overall readiness status
    pub ready: bool,

    /// Individual component checks
    pub checks: ReadinessChecks,
}

/// Individual readiness checks
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadinessChecks {
    /// Document store reachability
    pub store: bool,
}

/// Health check routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/ready", get(ready))
}

/// Basic health check
async fn health() -> Json<ApiResponse<HealthResponse>> {
    let response = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(response))
}

/// Readiness check, probing the document store
async fn ready(State(state): State<AppState>) -> Json<ApiResponse<ReadinessResponse>> {
    let checks = ReadinessChecks {
        store: state.store.list("workspaces").await.is_ok(),
    };

    let response = ReadinessResponse {
        ready: checks.store,
        checks,
    };

    Json(ApiResponse::success(response))
}

//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::services::fetcher::{ResourceState, ResourceStatus};
use crate::AppState;

/// Readiness probe detail.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub resources: Vec<ResourceStatus>,
}

/// Liveness probe. Always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe. Reports the cache state of each library resource.
///
/// The service stays ready while upstream is down; `degraded` means at
/// least one resource has no usable data.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let resources = state.dashboard.resource_statuses();
    let degraded = resources
        .iter()
        .any(|r| r.state == ResourceState::Unavailable);
    if degraded {
        tracing::warn!("Readiness check: library API resources unavailable");
    }

    ApiResponse::success(HealthStatus {
        status: if degraded { "degraded" } else { "ok" }.to_string(),
        resources,
    })
}

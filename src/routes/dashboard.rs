//! Dashboard routes: aggregated library statistics for the admin overview page.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::rbac::RequireAdmin;
use crate::services::dashboard::DashboardView;
use crate::AppState;

/// GET /api/v1/dashboard/stats: statistics, fetching stale resources as needed.
pub async fn stats(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let view = state.dashboard.load(Utc::now()).await;
    Ok(ApiResponse::success(view))
}

/// GET /api/v1/dashboard/snapshot: statistics from the cache only.
pub async fn snapshot(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    Ok(ApiResponse::success(state.dashboard.snapshot(Utc::now())))
}

/// POST /api/v1/dashboard/refresh: refetch every resource.
pub async fn refresh(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    tracing::info!(user_id = %admin.id, username = %admin.username, "Manual dashboard refresh");
    let view = state.dashboard.refresh(Utc::now()).await;
    Ok(ApiResponse::success(view))
}

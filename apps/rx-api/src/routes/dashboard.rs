//! Dashboard handler. Money figures are integer cents (`totalSalesCents`).

use axum::extract::State;
use axum::Json;
use rx_core::DashboardStats;

use crate::error::ApiResult;
use crate::state::AppState;

/// GET /dashboard/stats
pub async fn stats(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let stats = state.db.dashboard().stats().await?;
    Ok(Json(stats))
}

//! Dashboard statistics proxy.

use axum::{Json, extract::State};

use crate::{
    AppState,
    api::models::stats::DashboardStats,
    auth::current_user::SessionCookie,
    errors::Result,
    types::Resource,
};

const STATS_PATH: &str = "/api/dashboard/stats/";

/// Fetch aggregate dashboard statistics
#[utoipa::path(
    get,
    path = "/dashboard/stats",
    tag = "dashboard",
    responses(
        (status = 200, description = "Aggregate statistics", body = DashboardStats),
        (status = 500, description = "Backend unavailable or rejected the request"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn dashboard_stats(State(state): State<AppState>, cookie: SessionCookie) -> Result<Json<serde_json::Value>> {
    let value = state
        .cache
        .get_or_fetch(Resource::DashboardStats, cookie.scope(), async {
            state
                .proxy
                .get(STATS_PATH, cookie.0.as_ref(), "Failed to fetch dashboard stats")
                .await
        })
        .await?;

    Ok(Json(value.as_ref().clone()))
}

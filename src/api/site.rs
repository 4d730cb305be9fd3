//! Public site information API
//!
//! Lets the dashboard show which clock the server evaluates against.

use axum::{extract::State, Json};

use crate::api::common::format_instant;
use crate::api::middleware::AppState;
use crate::api::responses::{SiteInfoResponse, StatsInfo};

/// GET /api/v1/site/info - Get service information
pub async fn get_site_info(State(state): State<AppState>) -> Json<SiteInfoResponse> {
    let stats = &state.request_stats;

    Json(SiteInfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        clock: state.clock.describe(),
        server_time: format_instant(state.clock.now()),
        stats: StatsInfo {
            total_requests: stats.total_requests(),
            avg_response_time_us: stats.avg_response_time_us(),
            uptime_seconds: stats.uptime_seconds(),
        },
    })
}

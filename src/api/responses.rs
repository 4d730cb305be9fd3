//! Shared API request and response types

use serde::{Deserialize, Serialize};

use crate::models::{CalendarDate, SessionInput, SessionStatus, TimeOfDay};
use crate::services::report::ReportColumns;
use crate::services::session::{RowEvaluation, StatusSummary};
use crate::services::status::SessionWindow;

// ============================================================================
// Status Types
// ============================================================================

/// Query parameters for a single status lookup
///
/// Everything is optional here so that missing values are reported in the
/// API error shape instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    /// Evaluate at this instant instead of the clock
    pub at: Option<String>,
}

/// Derived status of one session
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub date: CalendarDate,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub window: SessionWindow,
    pub status: SessionStatus,
    pub evaluated_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_after_seconds: Option<i64>,
}

/// Batch of dashboard rows to evaluate
#[derive(Debug, Deserialize)]
pub struct BatchStatusRequest {
    pub sessions: Vec<SessionInput>,
    #[serde(default)]
    pub at: Option<String>,
}

/// Per-row statuses plus the summary
#[derive(Debug, Serialize)]
pub struct BatchStatusResponse {
    pub evaluated_at: String,
    pub results: Vec<RowEvaluation>,
    pub summary: StatusSummary,
}

// ============================================================================
// Report Types
// ============================================================================

/// Rows to export, with optional column selection
#[derive(Debug, Deserialize)]
pub struct SessionReportRequest {
    pub sessions: Vec<SessionInput>,
    /// Falls back to `report.default_columns` from configuration
    #[serde(default)]
    pub columns: Option<ReportColumns>,
    #[serde(default)]
    pub at: Option<String>,
}

// ============================================================================
// Site Types
// ============================================================================

/// Response for public site info
#[derive(Debug, Serialize)]
pub struct SiteInfoResponse {
    pub version: String,
    /// Clock in use, e.g. `local` or `utc+07:00`
    pub clock: String,
    pub server_time: String,
    pub stats: StatsInfo,
}

#[derive(Debug, Serialize)]
pub struct StatsInfo {
    pub total_requests: u64,
    pub avg_response_time_us: f64,
    pub uptime_seconds: u64,
}

//! Session status API endpoints

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};

use crate::api::common::{check_batch_size, format_instant, json_rejection, required, resolve_now};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{BatchStatusRequest, BatchStatusResponse, StatusQuery, StatusResponse};
use crate::services::date_input::{parse_calendar_date, parse_time_of_day};
use crate::services::session::SessionEvaluator;
use crate::services::status::{derive_status, seconds_until_transition, SessionWindow};

/// GET /api/v1/status - Derive the status of one session
///
/// Query: `date`, `start_time`, `end_time`, optional `at`.
pub async fn get_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<StatusResponse>, ApiError> {
    let date = parse_calendar_date(required(&query.date, "date")?)
        .map_err(|e| ApiError::invalid_field("date", e.to_string()))?;
    let start_time = parse_time_of_day(required(&query.start_time, "start_time")?)
        .map_err(|e| ApiError::invalid_field("start_time", e.to_string()))?;
    let end_time = parse_time_of_day(required(&query.end_time, "end_time")?)
        .map_err(|e| ApiError::invalid_field("end_time", e.to_string()))?;
    let now = resolve_now(&state, query.at.as_deref())?;

    let status = derive_status(date, start_time, end_time, now);
    let refresh_after_seconds = seconds_until_transition(date, start_time, end_time, now)
        .map(|secs| secs.min(state.status_config.max_refresh_seconds));

    Ok(Json(StatusResponse {
        date,
        start_time,
        end_time,
        window: SessionWindow::classify(start_time, end_time),
        status,
        evaluated_at: format_instant(now),
        refresh_after_seconds,
    }))
}

/// POST /api/v1/status/batch - Derive statuses for a list of sessions
///
/// Rows are evaluated independently; a bad row does not fail the request.
/// What happens to rows with an unparseable date is decided by
/// `status.invalid_date_policy`.
pub async fn batch_status(
    State(state): State<AppState>,
    payload: Result<Json<BatchStatusRequest>, JsonRejection>,
) -> Result<Json<BatchStatusResponse>, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;
    check_batch_size(&state, request.sessions.len())?;
    let now = resolve_now(&state, request.at.as_deref())?;

    let evaluator = SessionEvaluator::new(now, state.status_config.invalid_date_policy)
        .with_max_refresh_seconds(state.status_config.max_refresh_seconds);
    let batch = evaluator.evaluate_batch(request.sessions);

    tracing::debug!(
        "Evaluated {} sessions at {} ({} invalid)",
        batch.summary.total,
        now,
        batch.summary.invalid
    );

    Ok(Json(BatchStatusResponse {
        evaluated_at: format_instant(now),
        results: batch.results,
        summary: batch.summary,
    }))
}

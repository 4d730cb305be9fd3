//! Common API utilities and shared types
//!
//! This module contains helpers used across the status and report endpoints.

use axum::extract::rejection::JsonRejection;
use chrono::NaiveDateTime;

use crate::api::middleware::{ApiError, AppState};
use crate::services::date_input::parse_evaluation_instant;

/// Format used for `evaluated_at` and `server_time` fields
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format(INSTANT_FORMAT).to_string()
}

/// Instant to evaluate against: the `at` override if given, the clock otherwise
pub fn resolve_now(state: &AppState, at: Option<&str>) -> Result<NaiveDateTime, ApiError> {
    match at {
        Some(at) => parse_evaluation_instant(at).map_err(|e| ApiError::invalid_field("at", e.to_string())),
        None => Ok(state.clock.now()),
    }
}

/// Value of a required query parameter
pub fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ApiError::invalid_field(field, format!("Missing required parameter '{}'", field))),
    }
}

/// Reject batches larger than the configured limit
pub fn check_batch_size(state: &AppState, len: usize) -> Result<(), ApiError> {
    let max = state.status_config.max_batch_size;
    if len > max {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("Too many sessions: {} (maximum {})", len, max),
            serde_json::json!({ "field": "sessions", "max": max }),
        ));
    }
    Ok(())
}

/// Turn a JSON extractor rejection into the API error shape
pub fn json_rejection(rejection: JsonRejection) -> ApiError {
    ApiError::validation_error(rejection.body_text())
}

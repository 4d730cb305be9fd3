//! Report export API endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};

use crate::api::common::{check_batch_size, json_rejection, resolve_now};
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::SessionReportRequest;
use crate::models::Session;
use crate::services::report::{report_filename, SessionReport};
use crate::services::session::resolve_input;

/// POST /api/v1/reports/sessions.csv - Export sessions as CSV
///
/// Unlike the batch status endpoint, a report is all or nothing: if any row
/// is invalid the request fails and lists every bad row.
pub async fn sessions_csv(
    State(state): State<AppState>,
    payload: Result<Json<SessionReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(json_rejection)?;
    check_batch_size(&state, request.sessions.len())?;
    let now = resolve_now(&state, request.at.as_deref())?;

    let mut sessions: Vec<Session> = Vec::with_capacity(request.sessions.len());
    let mut invalid = Vec::new();
    for (index, input) in request.sessions.into_iter().enumerate() {
        match resolve_input(input) {
            Ok(session) => sessions.push(session),
            Err(e) => invalid.push(serde_json::json!({ "index": index, "message": e.to_string() })),
        }
    }
    if !invalid.is_empty() {
        return Err(ApiError::with_details(
            "VALIDATION_ERROR",
            format!("{} session(s) could not be parsed", invalid.len()),
            serde_json::json!({ "rows": invalid }),
        ));
    }

    let columns = request.columns.unwrap_or(state.report_config.default_columns);
    let body = SessionReport::new(columns).render(&sessions, now);
    let filename = report_filename(&state.report_config.filename_prefix, now);

    tracing::info!("Exported {} sessions to {}", sessions.len(), filename);

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

//! Session evaluation
//!
//! Turns dashboard rows into typed sessions and evaluates their status at a
//! given instant, one row at a time or as a batch with a per-status summary.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::config::InvalidDatePolicy;
use crate::models::{DateInputError, Session, SessionInput, SessionStatus, TimeInputError};
use crate::services::date_input::{parse_calendar_date, parse_time_of_day};
use crate::services::status::{self, SessionWindow};

/// Error type for session input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] DateInputError),
    #[error("Invalid {field}: {source}")]
    InvalidTime {
        field: &'static str,
        source: TimeInputError,
    },
}

/// Parse the textual fields of a dashboard row into a typed session
pub fn resolve_input(input: SessionInput) -> Result<Session, SessionError> {
    let start_time = parse_time_of_day(&input.start_time).map_err(|source| SessionError::InvalidTime {
        field: "start_time",
        source,
    })?;
    let end_time = parse_time_of_day(&input.end_time).map_err(|source| SessionError::InvalidTime {
        field: "end_time",
        source,
    })?;
    let date = parse_calendar_date(&input.date)?;

    Ok(Session {
        id: input.id,
        kind: input.kind,
        title: input.title,
        photographer: input.photographer,
        editor: input.editor,
        lapangan: input.lapangan,
        date,
        start_time,
        end_time,
        cancelled: input.cancelled,
    })
}

/// Evaluation of a single row
#[derive(Debug, Clone, Serialize)]
pub struct RowEvaluation {
    /// Position of the row in the request
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<SessionWindow>,
    /// Seconds until the status next changes, capped by configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_after_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Per-status counts for a dashboard badge row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub cancelled: usize,
    /// Rows whose input could not be parsed, whatever the policy did with them
    pub invalid: usize,
}

impl StatusSummary {
    pub fn record(&mut self, status: SessionStatus) {
        match status {
            SessionStatus::Pending => self.pending += 1,
            SessionStatus::InProgress => self.in_progress += 1,
            SessionStatus::Completed => self.completed += 1,
            SessionStatus::Cancelled => self.cancelled += 1,
        }
    }
}

/// Result of evaluating a batch of rows
#[derive(Debug, Clone, Serialize)]
pub struct BatchEvaluation {
    pub results: Vec<RowEvaluation>,
    pub summary: StatusSummary,
}

/// Batch evaluator bound to one instant and one policy
#[derive(Debug, Clone, Copy)]
pub struct SessionEvaluator {
    now: NaiveDateTime,
    policy: InvalidDatePolicy,
    max_refresh_seconds: i64,
}

impl SessionEvaluator {
    pub fn new(now: NaiveDateTime, policy: InvalidDatePolicy) -> Self {
        Self {
            now,
            policy,
            max_refresh_seconds: i64::MAX,
        }
    }

    /// Cap the re-evaluation hint
    pub fn with_max_refresh_seconds(mut self, max_refresh_seconds: i64) -> Self {
        self.max_refresh_seconds = max_refresh_seconds;
        self
    }

    /// Evaluate an already typed session
    pub fn evaluate_session(&self, index: usize, session: &Session) -> RowEvaluation {
        let status = session.status_at(self.now);
        let refresh_after_seconds = if status.is_final() {
            None
        } else {
            status::seconds_until_transition(session.date, session.start_time, session.end_time, self.now)
                .map(|secs| secs.min(self.max_refresh_seconds))
        };

        RowEvaluation {
            index,
            id: session.id,
            status: Some(status),
            window: Some(SessionWindow::classify(session.start_time, session.end_time)),
            refresh_after_seconds,
            warning: None,
            error: None,
        }
    }

    /// Evaluate one dashboard row, applying the invalid-date policy
    pub fn evaluate_input(&self, index: usize, input: SessionInput) -> RowEvaluation {
        let id = input.id;
        let cancelled = input.cancelled;

        match resolve_input(input) {
            Ok(session) => self.evaluate_session(index, &session),
            Err(err @ SessionError::InvalidDate(_)) if self.policy == InvalidDatePolicy::Pending => {
                tracing::debug!("Row {} has an invalid date, reporting as pending: {}", index, err);
                let status = if cancelled {
                    SessionStatus::Cancelled
                } else {
                    SessionStatus::Pending
                };
                RowEvaluation {
                    index,
                    id,
                    status: Some(status),
                    window: None,
                    refresh_after_seconds: None,
                    warning: Some(err.to_string()),
                    error: None,
                }
            }
            Err(err) => {
                tracing::debug!("Row {} rejected: {}", index, err);
                RowEvaluation {
                    index,
                    id,
                    status: None,
                    window: None,
                    refresh_after_seconds: None,
                    warning: None,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    /// Evaluate every row, keeping input order
    pub fn evaluate_batch(&self, inputs: Vec<SessionInput>) -> BatchEvaluation {
        let mut summary = StatusSummary::default();
        let results: Vec<RowEvaluation> = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let row = self.evaluate_input(index, input);
                summary.total += 1;
                if row.error.is_some() || row.warning.is_some() {
                    summary.invalid += 1;
                }
                if let Some(status) = row.status {
                    summary.record(status);
                }
                row
            })
            .collect();

        BatchEvaluation { results, summary }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarDate, TimeOfDay};

    fn now() -> NaiveDateTime {
        CalendarDate::from_ymd(2026, 10, 18)
            .unwrap()
            .at(TimeOfDay::new(10, 30).unwrap())
    }

    fn row(date: &str, start: &str, end: &str) -> SessionInput {
        SessionInput {
            date: date.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_input_parses_fields() {
        let mut input = row("2026-10-18T00:00:00+07:00", "09:00:00", "12:00");
        input.title = "Prewedding Ayu & Dimas".to_string();
        input.lapangan = Some("Lapangan A".to_string());

        let session = resolve_input(input).unwrap();
        assert_eq!(session.date.to_string(), "2026-10-18");
        assert_eq!(session.start_time.to_string(), "09:00");
        assert_eq!(session.title, "Prewedding Ayu & Dimas");
        assert_eq!(session.lapangan.as_deref(), Some("Lapangan A"));
    }

    #[test]
    fn test_resolve_input_reports_bad_time_field() {
        let err = resolve_input(row("2026-10-18", "09:00", "25:00")).unwrap_err();
        assert!(matches!(err, SessionError::InvalidTime { field: "end_time", .. }));
    }

    #[test]
    fn test_resolve_input_reports_bad_date() {
        let err = resolve_input(row("not-a-date", "09:00", "12:00")).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidDate(DateInputError::Unrecognized("not-a-date".to_string()))
        );
    }

    #[test]
    fn test_evaluate_input_in_progress_has_refresh_hint() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Reject);
        let result = evaluator.evaluate_input(0, row("2026-10-18", "09:00", "12:00"));

        assert_eq!(result.status, Some(SessionStatus::InProgress));
        assert_eq!(result.window, Some(SessionWindow::SameDay));
        // 12:01 is the first completed minute
        assert_eq!(result.refresh_after_seconds, Some(91 * 60));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_refresh_hint_is_capped() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Reject).with_max_refresh_seconds(60);
        let result = evaluator.evaluate_input(0, row("2026-10-20", "09:00", "12:00"));

        assert_eq!(result.status, Some(SessionStatus::Pending));
        assert_eq!(result.refresh_after_seconds, Some(60));
    }

    #[test]
    fn test_completed_has_no_refresh_hint() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Reject);
        let result = evaluator.evaluate_input(0, row("2026-10-17", "09:00", "12:00"));

        assert_eq!(result.status, Some(SessionStatus::Completed));
        assert_eq!(result.refresh_after_seconds, None);
    }

    #[test]
    fn test_cancelled_row_has_no_refresh_hint() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Reject);
        let mut input = row("2026-10-18", "09:00", "12:00");
        input.cancelled = true;
        let result = evaluator.evaluate_input(0, input);

        assert_eq!(result.status, Some(SessionStatus::Cancelled));
        assert_eq!(result.refresh_after_seconds, None);
    }

    #[test]
    fn test_reject_policy_reports_error() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Reject);
        let result = evaluator.evaluate_input(3, row("kemarin", "09:00", "12:00"));

        assert_eq!(result.index, 3);
        assert_eq!(result.status, None);
        assert!(result.error.unwrap().contains("kemarin"));
    }

    #[test]
    fn test_pending_policy_reports_pending_with_warning() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Pending);
        let result = evaluator.evaluate_input(0, row("kemarin", "09:00", "12:00"));

        assert_eq!(result.status, Some(SessionStatus::Pending));
        assert!(result.warning.is_some());
        assert!(result.error.is_none());
    }

    #[test]
    fn test_pending_policy_does_not_cover_bad_times() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Pending);
        let result = evaluator.evaluate_input(0, row("2026-10-18", "noon", "12:00"));

        assert_eq!(result.status, None);
        assert!(result.error.unwrap().contains("start_time"));
    }

    #[test]
    fn test_batch_keeps_order_and_summarizes() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Reject);
        let mut cancelled = row("2026-10-18", "09:00", "12:00");
        cancelled.cancelled = true;

        let batch = evaluator.evaluate_batch(vec![
            row("2026-10-18", "14:00", "16:00"),
            row("2026-10-18", "09:00", "12:00"),
            row("2026-10-17", "23:00", "02:00"),
            row("2026-10-17", "23:00", "11:00"),
            cancelled,
            row("??", "09:00", "12:00"),
        ]);

        let statuses: Vec<_> = batch.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![
                Some(SessionStatus::Pending),
                Some(SessionStatus::InProgress),
                Some(SessionStatus::Completed),
                Some(SessionStatus::InProgress),
                Some(SessionStatus::Cancelled),
                None,
            ]
        );
        assert_eq!(
            batch.summary,
            StatusSummary {
                total: 6,
                pending: 1,
                in_progress: 2,
                completed: 1,
                cancelled: 1,
                invalid: 1,
            }
        );
    }

    #[test]
    fn test_batch_with_pending_policy_counts_invalid_rows() {
        let evaluator = SessionEvaluator::new(now(), InvalidDatePolicy::Pending);
        let batch = evaluator.evaluate_batch(vec![row("??", "09:00", "12:00")]);

        assert_eq!(batch.summary.pending, 1);
        assert_eq!(batch.summary.invalid, 1);
        assert_eq!(batch.summary.total, 1);
    }
}

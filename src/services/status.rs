//! Session status derivation
//!
//! Computes `pending`, `in_progress` or `completed` for a time-boxed session
//! by comparing the current wall-clock instant against the session's window.
//!
//! A window whose end time is at or before its start time runs past midnight:
//! it starts on `date` and ends on the following calendar day. Comparisons are
//! made at minute precision and both window bounds are inclusive.
//!
//! Everything here is a pure function of its arguments. The caller supplies
//! `now`, usually from a `services::clock::Clock`.

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{CalendarDate, SessionStatus, TimeOfDay};

/// Shape of a session's time window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionWindow {
    /// `end_time > start_time`, the session starts and ends on `date`
    SameDay,
    /// `end_time <= start_time`, the session ends on the day after `date`
    CrossesMidnight,
}

impl SessionWindow {
    pub fn classify(start: TimeOfDay, end: TimeOfDay) -> Self {
        if end > start {
            SessionWindow::SameDay
        } else {
            SessionWindow::CrossesMidnight
        }
    }
}

/// Derive the status of a session at `now`.
///
/// Never returns `SessionStatus::Cancelled`; cancellation is a manual
/// override applied by `Session::status_at`.
pub fn derive_status(
    date: CalendarDate,
    start: TimeOfDay,
    end: TimeOfDay,
    now: NaiveDateTime,
) -> SessionStatus {
    let today = CalendarDate::from(now.date());
    let current = TimeOfDay::of(now);

    match SessionWindow::classify(start, end) {
        SessionWindow::SameDay => match today.cmp(&date) {
            Ordering::Less => SessionStatus::Pending,
            Ordering::Equal if current < start => SessionStatus::Pending,
            Ordering::Equal if current <= end => SessionStatus::InProgress,
            Ordering::Equal | Ordering::Greater => SessionStatus::Completed,
        },
        SessionWindow::CrossesMidnight => {
            match today.cmp(&date) {
                Ordering::Less => return SessionStatus::Pending,
                Ordering::Equal if current < start => return SessionStatus::Pending,
                Ordering::Equal => return SessionStatus::InProgress,
                Ordering::Greater => {}
            }

            match date.succ().map(|next| today.cmp(&next)) {
                Some(Ordering::Equal) if current <= end => SessionStatus::InProgress,
                Some(Ordering::Equal) | Some(Ordering::Greater) => SessionStatus::Completed,
                // today sits strictly between date and its successor, or the
                // calendar ran out; neither is reachable with a valid `now`
                _ => SessionStatus::Pending,
            }
        }
    }
}

/// First minute at which the derived status will differ from the status at
/// `now`, or `None` once the session is completed.
pub fn next_transition(
    date: CalendarDate,
    start: TimeOfDay,
    end: TimeOfDay,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    let now_minute = truncate_to_minute(now);

    let candidate = match derive_status(date, start, end, now) {
        SessionStatus::Pending => date.at(start),
        SessionStatus::InProgress => {
            let end_day = match SessionWindow::classify(start, end) {
                SessionWindow::SameDay => date,
                SessionWindow::CrossesMidnight => date.succ()?,
            };
            end_day.at(end) + Duration::minutes(1)
        }
        SessionStatus::Completed | SessionStatus::Cancelled => return None,
    };

    (candidate > now_minute).then_some(candidate)
}

/// Whole seconds from `now` until the next status change
pub fn seconds_until_transition(
    date: CalendarDate,
    start: TimeOfDay,
    end: TimeOfDay,
    now: NaiveDateTime,
) -> Option<i64> {
    next_transition(date, start, end, now).map(|at| (at - now).num_seconds().max(0))
}

fn truncate_to_minute(instant: NaiveDateTime) -> NaiveDateTime {
    instant
        .with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(instant)
}

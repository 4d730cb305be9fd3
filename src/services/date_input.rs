//! Loose date and time input from the dashboard
//!
//! The date pickers and backend payloads do not agree on a single date shape.
//! This adapter accepts the shapes seen in practice and turns them into typed
//! values, failing explicitly instead of guessing:
//!
//! - `YYYY-MM-DD`
//! - RFC 3339 date-times; the date is taken as written, without converting
//!   to another timezone
//! - `YYYY-MM-DDTHH:MM[:SS[.fff]]` and `YYYY-MM-DD HH:MM[:SS[.fff]]`
//! - `YYYY/MM/DD`
//!
//! Years always have four digits, months and days two. `18-10-26` or
//! `2026-1-5` are rejected rather than read as some other date.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{has_padded_date_prefix, CalendarDate, DateInputError, TimeInputError, TimeOfDay};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a calendar date from any accepted shape
pub fn parse_calendar_date(input: &str) -> Result<CalendarDate, DateInputError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DateInputError::Empty);
    }

    let unrecognized = || DateInputError::Unrecognized(s.to_string());

    if s.len() == 10 && has_padded_date_prefix(s, '/') {
        return NaiveDate::parse_from_str(s, "%Y/%m/%d")
            .map(CalendarDate::from)
            .map_err(|_| unrecognized());
    }
    if s.len() == 10 {
        return s.parse().map_err(|_| unrecognized());
    }

    parse_instant(s)
        .map(|instant| CalendarDate::from(instant.date()))
        .ok_or_else(unrecognized)
}

/// Parse a wall-clock instant (date and time)
///
/// RFC 3339 input keeps its local wall-clock reading; the offset is dropped.
pub fn parse_evaluation_instant(input: &str) -> Result<NaiveDateTime, DateInputError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DateInputError::Empty);
    }
    parse_instant(s).ok_or_else(|| DateInputError::Unrecognized(s.to_string()))
}

/// Parse a time of day (`HH:MM` or `HH:MM:SS`)
pub fn parse_time_of_day(input: &str) -> Result<TimeOfDay, TimeInputError> {
    input.parse()
}

fn parse_instant(s: &str) -> Option<NaiveDateTime> {
    if !has_padded_date_prefix(s, '-') {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

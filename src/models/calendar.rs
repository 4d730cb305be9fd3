//! Calendar date and time-of-day value types
//!
//! This module provides:
//! - `CalendarDate`: a timezone-naive calendar day (year, month, day)
//! - `TimeOfDay`: a minute-precision wall-clock time (`HH:MM`, 24-hour)
//! - Error types for parsing both from text
//!
//! Both types serialize as the zero-padded strings the dashboard exchanges
//! (`YYYY-MM-DD` and `HH:MM`).

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error type for calendar date input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateInputError {
    #[error("Date is empty")]
    Empty,
    #[error("Unrecognized date '{0}'")]
    Unrecognized(String),
}

/// Error type for time-of-day input
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimeInputError {
    #[error("Time is empty")]
    Empty,
    #[error("Malformed time '{0}', expected HH:MM")]
    Malformed(String),
    #[error("Time '{0}' is out of range")]
    OutOfRange(String),
}

// ============================================================================
// CalendarDate
// ============================================================================

/// Timezone-naive calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create a date from its components, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The following calendar day
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The preceding calendar day
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// Combine with a time of day into a wall-clock instant
    pub fn at(&self, time: TimeOfDay) -> NaiveDateTime {
        self.0.and_time(time.to_naive_time())
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for CalendarDate {
    type Err = DateInputError;

    /// Strict `YYYY-MM-DD` parsing: four-digit year, zero-padded month and
    /// day. Looser shapes go through `services::date_input::parse_calendar_date`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DateInputError::Empty);
        }
        if s.len() != 10 || !has_padded_date_prefix(s, '-') {
            return Err(DateInputError::Unrecognized(s.to_string()));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DateInputError::Unrecognized(s.to_string()))
    }
}

/// Whether `s` starts with `YYYY<sep>MM<sep>DD`, digits only
///
/// chrono's `%Y`, `%m` and `%d` accept any number of digits, so `18-10-26`
/// would otherwise parse as year 18.
pub(crate) fn has_padded_date_prefix(s: &str, separator: char) -> bool {
    let bytes = s.as_bytes();
    let Ok(sep) = u8::try_from(separator) else {
        return false;
    };
    bytes.len() >= 10
        && bytes[4] == sep
        && bytes[7] == sep
        && [0, 1, 2, 3, 5, 6, 8, 9].iter().all(|&i| bytes[i].is_ascii_digit())
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// TimeOfDay
// ============================================================================

/// Wall-clock time with minute precision
///
/// Field order matters: the derived ordering compares hour first, which makes
/// it identical to comparing the zero-padded `HH:MM` strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
}

impl TimeOfDay {
    /// Create a time of day, `None` if out of range
    pub fn new(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                hour: hour as u8,
                minute: minute as u8,
            })
        } else {
            None
        }
    }

    pub fn hour(&self) -> u32 {
        self.hour as u32
    }

    pub fn minute(&self) -> u32 {
        self.minute as u32
    }

    /// Truncate a wall-clock instant to its time of day
    pub fn of(instant: NaiveDateTime) -> Self {
        Self::from(instant.time())
    }

    pub fn to_naive_time(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour(), self.minute(), 0).unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Seconds and sub-seconds are dropped
    fn from(time: NaiveTime) -> Self {
        Self {
            hour: time.hour() as u8,
            minute: time.minute() as u8,
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for TimeOfDay {
    type Err = TimeInputError;

    /// Accepts `HH:MM` and `HH:MM:SS`; seconds are validated then truncated.
    /// A single-digit hour (`9:05`) is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimeInputError::Empty);
        }

        let malformed = || TimeInputError::Malformed(s.to_string());
        let mut parts = s.split(':');
        let hour = parts.next().ok_or_else(malformed)?;
        let minute = parts.next().ok_or_else(malformed)?;
        let second = parts.next();
        if parts.next().is_some() {
            return Err(malformed());
        }

        let hour = parse_digits(hour, 1..=2).ok_or_else(malformed)?;
        let minute = parse_digits(minute, 2..=2).ok_or_else(malformed)?;
        if let Some(second) = second {
            let second = parse_digits(second, 2..=2).ok_or_else(malformed)?;
            if second >= 60 {
                return Err(TimeInputError::OutOfRange(s.to_string()));
            }
        }

        Self::new(hour, minute).ok_or_else(|| TimeInputError::OutOfRange(s.to_string()))
    }
}

fn parse_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> Option<u32> {
    if !len.contains(&s.len()) || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}


/// Property-based tests for the value types
#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn time_strategy() -> impl Strategy<Value = TimeOfDay> {
        (0u32..24, 0u32..60).prop_map(|(h, m)| TimeOfDay::new(h, m).unwrap())
    }

    fn date_strategy() -> impl Strategy<Value = CalendarDate> {
        (1970i32..2100, 1u32..=12, 1u32..=28)
            .prop_map(|(y, m, d)| CalendarDate::from_ymd(y, m, d).unwrap())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        /// Ordering of times matches lexicographic ordering of their display
        #[test]
        fn time_order_matches_string_order(a in time_strategy(), b in time_strategy()) {
            prop_assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
        }

        #[test]
        fn time_display_parses_back(t in time_strategy()) {
            prop_assert_eq!(t.to_string().parse::<TimeOfDay>().unwrap(), t);
        }

        /// Ordering of dates matches lexicographic ordering of their display
        #[test]
        fn date_order_matches_string_order(a in date_strategy(), b in date_strategy()) {
            prop_assert_eq!(a.cmp(&b), a.to_string().cmp(&b.to_string()));
        }

        #[test]
        fn date_succ_is_strictly_later(d in date_strategy()) {
            let next = d.succ().unwrap();
            prop_assert!(next > d);
            prop_assert_eq!(next.pred(), Some(d));
        }
    }
}

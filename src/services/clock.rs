//! Wall-clock sources
//!
//! Status derivation never reads the system time itself. Handlers ask a
//! `Clock` for the current local wall-clock instant and pass it down.

use chrono::{FixedOffset, Local, NaiveDateTime, Utc};
use std::sync::Arc;

use crate::config::{ClockConfig, ClockMode, ConfigError};

/// Source of the current local wall-clock instant
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;

    /// Short human-readable description, shown in site info
    fn describe(&self) -> String;
}

/// Host local time
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn describe(&self) -> String {
        "local".to_string()
    }
}

/// UTC shifted by a fixed offset, independent of the host timezone
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset: FixedOffset,
}

impl OffsetClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }

    fn describe(&self) -> String {
        format!("utc{}", self.offset)
    }
}

/// Always returns the same instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }

    fn describe(&self) -> String {
        format!("fixed {}", self.0.format("%Y-%m-%dT%H:%M:%S"))
    }
}

/// Parse a UTC offset such as `+07:00`, `-0330` or `Z`
pub fn parse_utc_offset(s: &str) -> Option<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0);
    }
    s.parse::<FixedOffset>().ok()
}

/// Build the clock selected by configuration
pub fn clock_from_config(config: &ClockConfig) -> Result<Arc<dyn Clock>, ConfigError> {
    match config.mode {
        ClockMode::Local => Ok(Arc::new(LocalClock)),
        ClockMode::Offset => {
            let raw = config.utc_offset.as_deref().ok_or_else(|| {
                ConfigError::ValidationError("clock.utc_offset is required when clock.mode is 'offset'".to_string())
            })?;
            let offset = parse_utc_offset(raw).ok_or_else(|| {
                ConfigError::ValidationError(format!("clock.utc_offset '{}' is not a valid UTC offset", raw))
            })?;
            Ok(Arc::new(OffsetClock::new(offset)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_utc_offset_variants() {
        assert_eq!(parse_utc_offset("+07:00"), FixedOffset::east_opt(7 * 3600));
        assert_eq!(parse_utc_offset("+0700"), FixedOffset::east_opt(7 * 3600));
        assert_eq!(parse_utc_offset("-03:30"), FixedOffset::east_opt(-(3 * 3600 + 30 * 60)));
        assert_eq!(parse_utc_offset("Z"), FixedOffset::east_opt(0));
        assert_eq!(parse_utc_offset(" utc "), FixedOffset::east_opt(0));
        assert_eq!(parse_utc_offset("+05:45"), FixedOffset::east_opt(5 * 3600 + 45 * 60));
    }

    #[test]
    fn test_parse_utc_offset_rejects_garbage() {
        for input in ["", "07:00", "+7", "+24:00", "+07:60", "+ab:cd", "Asia/Jakarta"] {
            assert!(parse_utc_offset(input).is_none(), "expected rejection for {input}");
        }
    }

    #[test]
    fn test_fixed_clock_is_constant() {
        let instant = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let clock = FixedClock(instant);
        assert_eq!(clock.now(), instant);
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.describe(), "fixed 2026-10-18T09:00:00");
    }

    #[test]
    fn test_offset_clock_tracks_utc() {
        let clock = OffsetClock::new(FixedOffset::east_opt(7 * 3600).unwrap());
        let expected = Utc::now().naive_utc() + chrono::Duration::hours(7);
        let drift = (clock.now() - expected).num_seconds().abs();
        assert!(drift <= 1);
        assert_eq!(clock.describe(), "utc+07:00");
    }

    #[test]
    fn test_clock_from_config_local() {
        let clock = clock_from_config(&ClockConfig::default()).unwrap();
        assert_eq!(clock.describe(), "local");
    }

    #[test]
    fn test_clock_from_config_offset_requires_value() {
        let config = ClockConfig {
            mode: ClockMode::Offset,
            utc_offset: None,
        };
        assert!(clock_from_config(&config).is_err());
    }

    #[test]
    fn test_clock_from_config_offset() {
        let config = ClockConfig {
            mode: ClockMode::Offset,
            utc_offset: Some("+07:00".to_string()),
        };
        assert_eq!(clock_from_config(&config).unwrap().describe(), "utc+07:00");
    }
}

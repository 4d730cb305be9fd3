//! Session model
//!
//! This module provides:
//! - `Session` entity representing an assist or schedule booking
//! - `SessionStatus` enum for the derived lifecycle state
//! - `SessionKind` enum distinguishing assist sessions from schedules
//! - `SessionInput`, the loosely typed row the dashboard posts
//!
//! Status is never stored on a session. It is recomputed from the date, the
//! time window and the current instant every time it is needed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::calendar::{CalendarDate, TimeOfDay};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Not started yet
    Pending,
    /// Inside its time window
    InProgress,
    /// Time window has passed
    Completed,
    /// Manually cancelled, never derived from time
    Cancelled,
}

impl Default for SessionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pending => "pending",
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(SessionStatus::Pending),
            "in_progress" => Some(SessionStatus::InProgress),
            "completed" => Some(SessionStatus::Completed),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }

    /// Whether the status can no longer change as time passes
    pub fn is_final(&self) -> bool {
        matches!(self, SessionStatus::Completed | SessionStatus::Cancelled)
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of booking a session belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    /// Assist session (support crew booking)
    #[default]
    Assist,
    /// Regular production schedule
    Schedule,
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assist => write!(f, "assist"),
            Self::Schedule => write!(f, "schedule"),
        }
    }
}

/// Session entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Backend identifier, if the row came from the backend
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub kind: SessionKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default)]
    pub editor: Option<String>,
    /// Field (location) the session takes place on
    #[serde(default)]
    pub lapangan: Option<String>,
    /// Local calendar day the session starts on
    pub date: CalendarDate,
    pub start_time: TimeOfDay,
    /// End time; at or before `start_time` means the session runs past midnight
    pub end_time: TimeOfDay,
    /// Manual cancellation override
    #[serde(default)]
    pub cancelled: bool,
}

impl Session {
    pub fn new(date: CalendarDate, start_time: TimeOfDay, end_time: TimeOfDay) -> Self {
        Self {
            id: None,
            kind: SessionKind::default(),
            title: String::new(),
            photographer: None,
            editor: None,
            lapangan: None,
            date,
            start_time,
            end_time,
            cancelled: false,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_kind(mut self, kind: SessionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Status at `now`, honouring the manual cancellation override
    pub fn status_at(&self, now: NaiveDateTime) -> SessionStatus {
        if self.cancelled {
            return SessionStatus::Cancelled;
        }
        crate::services::status::derive_status(self.date, self.start_time, self.end_time, now)
    }
}

/// Session row as posted by the dashboard
///
/// Date and times stay as text here; `services::session::resolve_input`
/// turns them into typed values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionInput {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub kind: SessionKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub photographer: Option<String>,
    #[serde(default)]
    pub editor: Option<String>,
    #[serde(default)]
    pub lapangan: Option<String>,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub cancelled: bool,
}

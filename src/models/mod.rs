//! Data models
//!
//! This module contains the data structures used throughout the service:
//! - Calendar value types (CalendarDate, TimeOfDay)
//! - The Session entity and its derived SessionStatus
//! - Input types posted by the dashboard

mod calendar;
mod session;

pub use calendar::{CalendarDate, DateInputError, TimeInputError, TimeOfDay};
pub(crate) use calendar::has_padded_date_prefix;
pub use session::{Session, SessionInput, SessionKind, SessionStatus};

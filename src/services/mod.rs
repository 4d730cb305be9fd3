//! Services layer - Business logic
//!
//! This module contains the business logic of the Jadwal service:
//! - Status derivation for time-boxed sessions
//! - Wall-clock sources
//! - Parsing of loosely typed dashboard input
//! - Batch evaluation and CSV reporting

pub mod clock;
pub mod date_input;
pub mod report;
pub mod session;
pub mod status;

pub use clock::{clock_from_config, Clock, FixedClock, LocalClock, OffsetClock};
pub use date_input::{parse_calendar_date, parse_evaluation_instant, parse_time_of_day};
pub use report::{report_filename, ReportColumns, SessionReport};
pub use session::{resolve_input, BatchEvaluation, RowEvaluation, SessionError, SessionEvaluator, StatusSummary};
pub use status::{derive_status, next_transition, seconds_until_transition, SessionWindow};

//! CSV session reports
//!
//! Builds the CSV export the dashboard offers for assist and schedule lists.
//! The status column is derived at render time like everywhere else.
//!
//! Output follows RFC 4180: CRLF line endings, and fields containing a comma,
//! a double quote, CR or LF are wrapped in double quotes with inner quotes
//! doubled.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

use crate::models::Session;

/// Optional report columns
///
/// `date`, `start_time`, `end_time`, `title` and `status` are always present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportColumns {
    #[serde(default)]
    pub kind: bool,
    #[serde(default)]
    pub photographer: bool,
    #[serde(default)]
    pub editor: bool,
    #[serde(default)]
    pub lapangan: bool,
}

impl ReportColumns {
    /// Every optional column switched on
    pub fn all() -> Self {
        Self {
            kind: true,
            photographer: true,
            editor: true,
            lapangan: true,
        }
    }
}

/// CSV report renderer
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionReport {
    columns: ReportColumns,
}

impl SessionReport {
    pub fn new(columns: ReportColumns) -> Self {
        Self { columns }
    }

    /// Header names in output order
    pub fn header(&self) -> Vec<&'static str> {
        let mut header = vec!["date", "start_time", "end_time"];
        if self.columns.kind {
            header.push("kind");
        }
        header.push("title");
        if self.columns.photographer {
            header.push("photographer");
        }
        if self.columns.editor {
            header.push("editor");
        }
        if self.columns.lapangan {
            header.push("lapangan");
        }
        header.push("status");
        header
    }

    /// Render the header and one line per session, statuses evaluated at `now`
    pub fn render(&self, sessions: &[Session], now: NaiveDateTime) -> String {
        let mut out = String::new();
        push_record(&mut out, self.header().into_iter().map(Cow::Borrowed));

        for session in sessions {
            push_record(&mut out, self.record(session, now).into_iter());
        }
        out
    }

    fn record<'a>(&self, session: &'a Session, now: NaiveDateTime) -> Vec<Cow<'a, str>> {
        let optional = |value: &'a Option<String>| Cow::Borrowed(value.as_deref().unwrap_or(""));

        let mut fields = vec![
            Cow::Owned(session.date.to_string()),
            Cow::Owned(session.start_time.to_string()),
            Cow::Owned(session.end_time.to_string()),
        ];
        if self.columns.kind {
            fields.push(Cow::Owned(session.kind.to_string()));
        }
        fields.push(Cow::Borrowed(session.title.as_str()));
        if self.columns.photographer {
            fields.push(optional(&session.photographer));
        }
        if self.columns.editor {
            fields.push(optional(&session.editor));
        }
        if self.columns.lapangan {
            fields.push(optional(&session.lapangan));
        }
        fields.push(Cow::Borrowed(session.status_at(now).as_str()));
        fields
    }
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    for (i, field) in fields.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&escape_field(&field));
    }
    out.push_str("\r\n");
}

/// Quote a field when it contains a delimiter, quote or line break
pub fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Download file name for a report generated on `now`'s date
pub fn report_filename(prefix: &str, now: NaiveDateTime) -> String {
    format!("{}-{}.csv", prefix, now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarDate, SessionKind, TimeOfDay};

    fn now() -> NaiveDateTime {
        CalendarDate::from_ymd(2026, 10, 18)
            .unwrap()
            .at(TimeOfDay::new(10, 0).unwrap())
    }

    fn session(day: u32, start: &str, end: &str, title: &str) -> Session {
        Session::new(
            CalendarDate::from_ymd(2026, 10, day).unwrap(),
            start.parse().unwrap(),
            end.parse().unwrap(),
        )
        .with_title(title)
    }

    #[test]
    fn test_minimal_columns() {
        let report = SessionReport::new(ReportColumns::default());
        assert_eq!(report.header(), vec!["date", "start_time", "end_time", "title", "status"]);

        let csv = report.render(&[session(18, "09:00", "12:00", "Wisuda")], now());
        assert_eq!(
            csv,
            "date,start_time,end_time,title,status\r\n2026-10-18,09:00,12:00,Wisuda,in_progress\r\n"
        );
    }

    #[test]
    fn test_all_columns_in_fixed_order() {
        let report = SessionReport::new(ReportColumns::all());
        assert_eq!(
            report.header(),
            vec![
                "date",
                "start_time",
                "end_time",
                "kind",
                "title",
                "photographer",
                "editor",
                "lapangan",
                "status"
            ]
        );

        let mut s = session(19, "08:00", "10:00", "Foto produk").with_kind(SessionKind::Schedule);
        s.photographer = Some("Rina".to_string());
        s.lapangan = Some("Studio 2".to_string());

        let csv = report.render(&[s], now());
        let line = csv.lines().nth(1).unwrap();
        assert_eq!(line, "2026-10-19,08:00,10:00,schedule,Foto produk,Rina,,Studio 2,pending");
    }

    #[test]
    fn test_some_optional_columns() {
        let columns = ReportColumns {
            editor: true,
            ..Default::default()
        };
        let report = SessionReport::new(columns);
        assert_eq!(report.header(), vec!["date", "start_time", "end_time", "title", "editor", "status"]);
    }

    #[test]
    fn test_fields_are_quoted_when_needed() {
        let report = SessionReport::new(ReportColumns::default());
        let csv = report.render(&[session(17, "23:00", "02:00", "Akad, \"resepsi\"\nmalam")], now());
        let body = csv.split_once("\r\n").unwrap().1;
        assert_eq!(body, "2026-10-17,23:00,02:00,\"Akad, \"\"resepsi\"\"\nmalam\",completed\r\n");
    }

    #[test]
    fn test_cancelled_sessions_report_cancelled() {
        let mut s = session(18, "09:00", "12:00", "Batal");
        s.cancelled = true;
        let csv = SessionReport::default().render(&[s], now());
        assert!(csv.ends_with(",cancelled\r\n"));
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let csv = SessionReport::default().render(&[], now());
        assert_eq!(csv, "date,start_time,end_time,title,status\r\n");
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_field(""), "");
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename("laporan-sesi", now()), "laporan-sesi-2026-10-18.csv");
    }
}

//! iCalendar rendering.

use chrono::{DateTime, NaiveDate, Utc};
use furlough_shared::types::{Location, RequestId};
use serde::{Deserialize, Serialize};

use crate::calendar::{DateRange, RangeError};

/// MIME type of the rendered document.
pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// Maximum octets per physical line, excluding the CR LF.
const MAX_LINE_OCTETS: usize = 75;

/// Display name prefix of every feed, `X-WR-CALNAME:PTO - <location>`.
const CALENDAR_TITLE: &str = "PTO";

const CRLF: &str = "\r\n";

/// An approved request as the exporter sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovedAbsence {
    /// Request ID, used as the event UID.
    pub request_id: RequestId,
    /// Display name of the employee.
    pub employee_name: String,
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off (inclusive).
    pub end_date: NaiveDate,
    /// Requester's note.
    pub note: Option<String>,
    /// When the request was approved.
    pub decided_at: Option<DateTime<Utc>>,
}

/// Why a record was left out of the document.
#[derive(Debug, thiserror::Error)]
enum SkipReason {
    #[error(transparent)]
    Range(RangeError),
    #[error("employee name is blank")]
    MissingName,
}

/// Renders approved absences as an iCalendar document.
#[derive(Debug, Clone)]
pub struct CalendarExporter {
    product_name: String,
}

impl CalendarExporter {
    /// Creates an exporter that identifies itself as `product_name`.
    #[must_use]
    pub fn new(product_name: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
        }
    }

    /// Renders the feed for `location`.
    ///
    /// Events are ordered by start date, end date, then request ID, so the
    /// input order does not matter. Records that cannot be rendered are
    /// logged and skipped; the rest of the document is still produced.
    #[must_use]
    pub fn render(&self, location: Location, absences: &[ApprovedAbsence]) -> String {
        let product = escape_text(&self.product_name);
        let mut lines = vec![
            "BEGIN:VCALENDAR".to_string(),
            "VERSION:2.0".to_string(),
            format!("PRODID:-//{product}//{location}//EN"),
            "CALSCALE:GREGORIAN".to_string(),
            format!("X-WR-CALNAME:{CALENDAR_TITLE} - {location}"),
        ];

        let mut ordered: Vec<&ApprovedAbsence> = absences.iter().collect();
        ordered.sort_by_key(|a| (a.start_date, a.end_date, a.request_id));

        for absence in ordered {
            match Self::event_lines(absence) {
                Ok(event) => lines.extend(event),
                Err(reason) => {
                    tracing::warn!(
                        request_id = %absence.request_id,
                        location = %location,
                        reason = %reason,
                        "Skipping approved request in calendar export"
                    );
                }
            }
        }

        lines.push("END:VCALENDAR".to_string());

        let mut document = String::new();
        for line in &lines {
            document.push_str(&fold_line(line));
            document.push_str(CRLF);
        }
        document
    }

    fn event_lines(absence: &ApprovedAbsence) -> Result<Vec<String>, SkipReason> {
        let range =
            DateRange::new(absence.start_date, absence.end_date).map_err(SkipReason::Range)?;
        let end_exclusive = range.end_exclusive().map_err(SkipReason::Range)?;

        let name = absence.employee_name.trim();
        if name.is_empty() {
            return Err(SkipReason::MissingName);
        }

        // Approval time keeps DTSTAMP stable across renders.
        let stamp = absence.decided_at.map_or_else(
            || format_date(range.start()),
            |at| at.format("%Y%m%dT%H%M%SZ").to_string(),
        );

        let mut lines = vec![
            "BEGIN:VEVENT".to_string(),
            format!("UID:{}", absence.request_id),
            format!("DTSTAMP:{stamp}"),
            format!("DTSTART:{}", format_date(range.start())),
            format!("DTEND:{}", format_date(end_exclusive)),
            format!("SUMMARY:{}", escape_text(&format!("{name} PTO"))),
        ];
        if let Some(note) = absence.note.as_deref().filter(|n| !n.trim().is_empty()) {
            lines.push(format!("DESCRIPTION:{}", escape_text(note)));
        }
        lines.push("END:VEVENT".to_string());
        Ok(lines)
    }
}

/// Dates render as midnight UTC.
fn format_date(date: NaiveDate) -> String {
    format!("{}T000000Z", date.format("%Y%m%d"))
}

/// Escapes a TEXT value: backslash, semicolon, comma, and line breaks.
#[must_use]
pub fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\\n");
            }
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out
}

/// Folds a content line so no physical line exceeds 75 octets.
///
/// Continuation lines start with a single space. Splits never fall inside
/// a UTF-8 sequence.
#[must_use]
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + 3 * (line.len() / (MAX_LINE_OCTETS - 1)));
    let mut width = 0;
    for ch in line.chars() {
        let len = ch.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(ch);
        width += len;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn absence(name: &str, start: NaiveDate, end: NaiveDate) -> ApprovedAbsence {
        ApprovedAbsence {
            request_id: RequestId::from_uuid(Uuid::from_u128(7)),
            employee_name: name.to_string(),
            start_date: start,
            end_date: end,
            note: None,
            decided_at: None,
        }
    }

    #[test]
    fn test_event_end_is_exclusive() {
        let exporter = CalendarExporter::new("PTO Portal");
        let doc = exporter.render(
            Location::CompanyA,
            &[absence("Ada Lovelace", date(2024, 3, 4), date(2024, 3, 6))],
        );
        assert!(doc.contains("DTSTART:20240304T000000Z\r\n"));
        assert!(doc.contains("DTEND:20240307T000000Z\r\n"));
        assert!(doc.contains("SUMMARY:Ada Lovelace PTO\r\n"));
    }

    #[test]
    fn test_header_fields() {
        let doc = CalendarExporter::new("PTO Portal").render(Location::CompanyB, &[]);
        assert_eq!(
            doc,
            "BEGIN:VCALENDAR\r\n\
             VERSION:2.0\r\n\
             PRODID:-//PTO Portal//CompanyB//EN\r\n\
             CALSCALE:GREGORIAN\r\n\
             X-WR-CALNAME:PTO - CompanyB\r\n\
             END:VCALENDAR\r\n"
        );
    }

    #[test]
    fn test_calendar_name_does_not_follow_product() {
        let doc = CalendarExporter::new("Acme Leave").render(Location::CompanyA, &[]);
        assert!(doc.contains("PRODID:-//Acme Leave//CompanyA//EN\r\n"));
        assert!(doc.contains("X-WR-CALNAME:PTO - CompanyA\r\n"));
    }

    #[test]
    fn test_every_line_ends_with_crlf() {
        let doc = CalendarExporter::new("PTO Portal").render(
            Location::CompanyA,
            &[absence("Grace", date(2024, 1, 1), date(2024, 1, 1))],
        );
        assert!(doc.ends_with("\r\n"));
        assert!(!doc.replace("\r\n", "").contains('\n'));
        assert!(!doc.replace("\r\n", "").contains('\r'));
    }

    #[test]
    fn test_summary_is_escaped() {
        let doc = CalendarExporter::new("PTO Portal").render(
            Location::CompanyA,
            &[absence("Doe, Jane; \\Ops", date(2024, 1, 1), date(2024, 1, 2))],
        );
        assert!(doc.contains("SUMMARY:Doe\\, Jane\\; \\\\Ops PTO\r\n"));
    }

    #[test]
    fn test_note_rendered_as_description() {
        let mut record = absence("Grace", date(2024, 1, 1), date(2024, 1, 1));
        record.note = Some("Flight at 9\nback, maybe".to_string());
        let doc = CalendarExporter::new("PTO Portal").render(Location::CompanyA, &[record]);
        assert!(doc.contains("DESCRIPTION:Flight at 9\\nback\\, maybe\r\n"));
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let good = absence("Grace", date(2024, 1, 1), date(2024, 1, 2));
        let mut reversed = absence("Alan", date(2024, 2, 5), date(2024, 2, 1));
        reversed.request_id = RequestId::from_uuid(Uuid::from_u128(8));
        let mut nameless = absence("  ", date(2024, 3, 1), date(2024, 3, 1));
        nameless.request_id = RequestId::from_uuid(Uuid::from_u128(9));

        let doc =
            CalendarExporter::new("PTO Portal").render(Location::CompanyA, &[reversed, good, nameless]);
        assert_eq!(doc.matches("BEGIN:VEVENT").count(), 1);
        assert!(doc.contains("SUMMARY:Grace PTO"));
        assert!(doc.ends_with("END:VCALENDAR\r\n"));
    }

    #[test]
    fn test_render_is_order_independent() {
        let mut a = absence("Ada", date(2024, 5, 1), date(2024, 5, 2));
        a.request_id = RequestId::from_uuid(Uuid::from_u128(1));
        let mut b = absence("Bob", date(2024, 4, 1), date(2024, 4, 9));
        b.request_id = RequestId::from_uuid(Uuid::from_u128(2));

        let exporter = CalendarExporter::new("PTO Portal");
        let first = exporter.render(Location::CompanyC, &[a.clone(), b.clone()]);
        let second = exporter.render(Location::CompanyC, &[b, a]);
        assert_eq!(first, second);
        assert!(first.find("Bob PTO").unwrap() < first.find("Ada PTO").unwrap());
    }

    #[test]
    fn test_dtstamp_uses_decision_time() {
        let mut record = absence("Ada", date(2024, 5, 1), date(2024, 5, 2));
        record.decided_at = Some(
            DateTime::parse_from_rfc3339("2024-04-20T13:45:10Z")
                .unwrap()
                .with_timezone(&Utc),
        );
        let doc = CalendarExporter::new("PTO Portal").render(Location::CompanyA, &[record]);
        assert!(doc.contains("DTSTAMP:20240420T134510Z\r\n"));
    }

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a\\b"), "a\\\\b");
        assert_eq!(escape_text("a;b,c"), "a\\;b\\,c");
        assert_eq!(escape_text("one\r\ntwo\nthree\rfour"), "one\\ntwo\\nthree\\nfour");
        assert_eq!(escape_text("plain"), "plain");
    }

    #[test]
    fn test_fold_line_short_is_untouched() {
        let line = "SUMMARY:short";
        assert_eq!(fold_line(line), line);
    }

    #[test]
    fn test_fold_line_long() {
        let line = format!("DESCRIPTION:{}", "x".repeat(100));
        let folded = fold_line(&line);
        let parts: Vec<&str> = folded.split("\r\n").collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 75);
        assert!(parts[1].starts_with(' '));
        assert_eq!(folded.replace("\r\n ", ""), line);
    }

    #[test]
    fn test_fold_line_respects_utf8() {
        let line = format!("SUMMARY:{}", "é".repeat(60));
        let folded = fold_line(&line);
        for part in folded.split("\r\n") {
            assert!(part.len() <= 75);
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }
}

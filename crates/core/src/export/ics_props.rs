//! Property-based tests for the calendar exporter.

use chrono::{Days, NaiveDate};
use proptest::prelude::*;
use uuid::Uuid;

use furlough_shared::types::{Location, RequestId};

use super::ics::{ApprovedAbsence, CalendarExporter, escape_text, fold_line};

/// Reverses `escape_text` for strings without carriage returns.
fn unescape(value: &str) -> String {
    let mut out = String::new();
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some(other) => out.push(other),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}

fn arb_absence() -> impl Strategy<Value = ApprovedAbsence> {
    (any::<u128>(), "[A-Za-z ,;\\\\]{1,30}", 0u64..365, 0u64..15).prop_map(
        |(id, name, start, len)| {
            let base = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            let start_date = base.checked_add_days(Days::new(start)).unwrap();
            ApprovedAbsence {
                request_id: RequestId::from_uuid(Uuid::from_u128(id)),
                employee_name: format!("E{name}"),
                start_date,
                end_date: start_date.checked_add_days(Days::new(len)).unwrap(),
                note: None,
                decided_at: None,
            }
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Escaped text has no raw line breaks and unescapes to the input.
    #[test]
    fn prop_escape_round_trips(value in "[^\r]{0,200}") {
        let escaped = escape_text(&value);
        prop_assert!(!escaped.contains('\n'));
        prop_assert_eq!(unescape(&escaped), value);
    }

    /// Folding bounds every physical line and unfolds to the original.
    #[test]
    fn prop_fold_bounds_line_length(value in "\\PC{0,300}") {
        let line = format!("DESCRIPTION:{value}");
        let folded = fold_line(&line);
        for part in folded.split("\r\n") {
            prop_assert!(part.len() <= 75);
        }
        prop_assert_eq!(folded.replace("\r\n ", ""), line);
    }

    /// Rendering does not depend on input order and emits one event per record.
    #[test]
    fn prop_render_is_stable(records in prop::collection::vec(arb_absence(), 0..12)) {
        let exporter = CalendarExporter::new("PTO Portal");
        let forward = exporter.render(Location::CompanyA, &records);
        let mut reversed = records.clone();
        reversed.reverse();
        prop_assert_eq!(&forward, &exporter.render(Location::CompanyA, &reversed));
        prop_assert_eq!(forward.matches("BEGIN:VEVENT").count(), records.len());
    }
}

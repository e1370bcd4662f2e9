//! Calendar feed export.
//!
//! Projects approved requests for one location into an iCalendar
//! (RFC 5545) document. Rendering is read-only and deterministic: the same
//! set of approved requests always yields the same bytes.

pub mod ics;

#[cfg(test)]
mod ics_props;

pub use ics::{ApprovedAbsence, CONTENT_TYPE, CalendarExporter, escape_text, fold_line};

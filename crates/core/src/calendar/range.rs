//! Inclusive calendar date ranges.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by date range arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// The end date lies before the start date.
    #[error("Invalid range: end {end} is before start {start}")]
    InvalidRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The date has no successor in the supported calendar.
    #[error("Date {0} is at the end of the supported calendar")]
    OutOfCalendar(NaiveDate),
}

impl RangeError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        400
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::OutOfCalendar(_) => "OUT_OF_CALENDAR",
        }
    }
}

/// A closed (end-inclusive) range of calendar dates with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if end < start {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days in the range, counting both ends.
    #[must_use]
    pub fn day_count(&self) -> i32 {
        let days = (self.end - self.start).num_days() + 1;
        // NaiveDate spans far fewer than i32::MAX days.
        i32::try_from(days).unwrap_or(i32::MAX)
    }

    /// Closed-interval overlap: ranges that share an endpoint overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// The day after `end`, for end-exclusive representations.
    pub fn end_exclusive(&self) -> Result<NaiveDate, RangeError> {
        export_end_exclusive(self.end)
    }
}

/// Counts the days in `[start, end]`.
///
/// # Errors
///
/// Returns [`RangeError::InvalidRange`] if `end < start`.
pub fn inclusive_day_count(start: NaiveDate, end: NaiveDate) -> Result<i32, RangeError> {
    DateRange::new(start, end).map(|range| range.day_count())
}

/// Converts an inclusive end date to the exclusive end used by calendar feeds.
///
/// Always exactly one calendar day later; no time zone is involved.
pub fn export_end_exclusive(end: NaiveDate) -> Result<NaiveDate, RangeError> {
    end.succ_opt().ok_or(RangeError::OutOfCalendar(end))
}

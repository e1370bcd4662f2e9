//! Blackout ranges and conflict queries.

use chrono::{DateTime, NaiveDate, Utc};
use furlough_shared::types::{BlackoutId, Location};
use serde::{Deserialize, Serialize};

use crate::calendar::{DateRange, RangeError};

/// A blocked date range for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutRange {
    /// Blackout ID.
    pub id: BlackoutId,
    /// Location the blackout applies to.
    pub location: Location,
    /// Blocked dates (inclusive).
    pub range: DateRange,
    /// Optional reason shown to administrators.
    pub reason: Option<String>,
    /// When the blackout was created.
    pub created_at: DateTime<Utc>,
}

impl BlackoutRange {
    /// Builds a new blackout, rejecting `end < start`.
    pub fn new(
        location: Location,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
    ) -> Result<Self, RangeError> {
        Ok(Self {
            id: BlackoutId::new(),
            location,
            range: DateRange::new(start, end)?,
            reason: reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            created_at: Utc::now(),
        })
    }

    /// Returns true if this blackout blocks `range` at `location`.
    #[must_use]
    pub fn blocks(&self, location: Location, range: &DateRange) -> bool {
        self.location == location && self.range.overlaps(range)
    }
}

/// Read-only view over a set of blackout ranges.
///
/// The store loads the candidate rows; the overlap rule lives here.
#[derive(Debug, Clone, Copy)]
pub struct BlackoutRegistry<'a> {
    ranges: &'a [BlackoutRange],
}

impl<'a> BlackoutRegistry<'a> {
    /// Wraps a slice of blackout ranges.
    #[must_use]
    pub const fn new(ranges: &'a [BlackoutRange]) -> Self {
        Self { ranges }
    }

    /// Returns true if any blackout at `location` overlaps `range`.
    #[must_use]
    pub fn any_overlap(&self, location: Location, range: &DateRange) -> bool {
        self.first_conflict(location, range).is_some()
    }

    /// Earliest-starting blackout at `location` that overlaps `range`.
    #[must_use]
    pub fn first_conflict(&self, location: Location, range: &DateRange) -> Option<&'a BlackoutRange> {
        self.ranges
            .iter()
            .filter(|b| b.blocks(location, range))
            .min_by_key(|b| (b.range.start(), b.range.end(), b.id))
    }

    /// All blackouts at `location`, ordered by start date.
    #[must_use]
    pub fn for_location(&self, location: Location) -> Vec<&'a BlackoutRange> {
        let mut found: Vec<_> = self
            .ranges
            .iter()
            .filter(|b| b.location == location)
            .collect();
        found.sort_by_key(|b| (b.range.start(), b.range.end(), b.id));
        found
    }
}

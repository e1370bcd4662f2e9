//! Company locations.
//!
//! Locations scope blackout ranges and calendar feeds. The set is closed;
//! free-form strings are parsed into this enum at the boundary.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A company location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Location {
    /// Company A.
    CompanyA,
    /// Company B.
    CompanyB,
    /// Company C.
    CompanyC,
}

/// Returned when a location key is not one of the known locations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown location: {0}")]
pub struct UnknownLocation(pub String);

impl Location {
    /// Every location, in display order.
    pub const ALL: [Self; 3] = [Self::CompanyA, Self::CompanyB, Self::CompanyC];

    /// Returns the wire key of the location.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CompanyA => "CompanyA",
            Self::CompanyB => "CompanyB",
            Self::CompanyC => "CompanyC",
        }
    }

    /// Parses a location key, ignoring ASCII case.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|loc| loc.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Location {
    type Err = UnknownLocation;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownLocation(s.to_string()))
    }
}

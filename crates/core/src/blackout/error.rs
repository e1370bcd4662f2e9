//! Blackout registry error types.

use furlough_shared::types::BlackoutId;
use thiserror::Error;

use crate::calendar::RangeError;

/// Errors that can occur while maintaining blackout ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlackoutError {
    /// The blackout's end date lies before its start date.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// No blackout with this ID exists.
    #[error("Blackout {0} not found")]
    NotFound(BlackoutId),

    /// Store failure; the operation may be retried.
    #[error("Database error: {0}")]
    Database(String),
}

impl BlackoutError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Range(e) => e.status_code(),
            Self::NotFound(_) => 404,
            Self::Database(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Range(e) => e.error_code(),
            Self::NotFound(_) => "BLACKOUT_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}

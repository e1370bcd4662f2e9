//! Lifecycle error types.
//!
//! Every failed transition returns one of these; none of them leave the
//! request or the ledger partially modified.

use chrono::NaiveDate;
use furlough_shared::types::{BlackoutId, EmployeeId, RequestId};
use thiserror::Error;

use crate::calendar::RangeError;
use crate::ledger::LedgerError;
use crate::lifecycle::types::RequestStatus;

/// Errors that can occur during request lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The request's end date lies before its start date.
    #[error(transparent)]
    Range(#[from] RangeError),

    /// A blackout at the request's location overlaps the requested dates.
    #[error("Requested dates overlap blackout {blackout_id} ({start} to {end})")]
    BlackoutConflict {
        /// The conflicting blackout.
        blackout_id: BlackoutId,
        /// Blackout start date.
        start: NaiveDate,
        /// Blackout end date.
        end: NaiveDate,
    },

    /// Attempted an invalid status transition.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status.
        from: RequestStatus,
        /// The attempted target status.
        to: RequestStatus,
    },

    /// Request not found.
    #[error("Request {0} not found")]
    RequestNotFound(RequestId),

    /// Employee not found.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// Only the requesting employee may cancel a request.
    #[error("Employee {requester_id} did not submit request {request_id}")]
    NotRequester {
        /// The request.
        request_id: RequestId,
        /// Who attempted the cancellation.
        requester_id: EmployeeId,
    },

    /// The balance debit failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Store failure; the whole transition may be retried.
    #[error("Database error: {0}")]
    Database(String),
}

impl LifecycleError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Range(e) => e.status_code(),
            Self::Ledger(e) => e.status_code(),
            Self::NotRequester { .. } => 403,
            Self::RequestNotFound(_) | Self::EmployeeNotFound(_) => 404,
            Self::BlackoutConflict { .. } | Self::InvalidTransition { .. } => 409,
            Self::Database(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Range(e) => e.error_code(),
            Self::Ledger(e) => e.error_code(),
            Self::BlackoutConflict { .. } => "BLACKOUT_CONFLICT",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::RequestNotFound(_) => "REQUEST_NOT_FOUND",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::NotRequester { .. } => "NOT_REQUESTER",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if retrying the same transition may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Database(_) => true,
            Self::Ledger(e) => e.is_retryable(),
            _ => false,
        }
    }
}

//! Lifecycle domain types.

use chrono::{DateTime, NaiveDate, Utc};
use furlough_shared::types::{EmployeeId, Location, RequestId};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::calendar::{DateRange, RangeError};

/// Status of a time-off request.
///
/// Requests start as `Pending`; every other status is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestStatus {
    /// Awaiting a decision.
    Pending,
    /// Approved; the balance has been debited.
    Approved,
    /// Denied by an administrator.
    Denied,
    /// Withdrawn by the requester.
    Cancelled,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Parses a status from a string, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "APPROVED" => Some(Self::Approved),
            "DENIED" => Some(Self::Denied),
            "CANCELLED" | "CANCELED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if no transition may leave this status.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A time-off request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOffRequest {
    /// Request ID.
    pub id: RequestId,
    /// Requesting employee.
    pub employee_id: EmployeeId,
    /// Employee's home location at submission time.
    pub location: Location,
    /// First day off.
    pub start_date: NaiveDate,
    /// Last day off (inclusive).
    pub end_date: NaiveDate,
    /// Inclusive day count of the range.
    pub days_requested: i32,
    /// Free-text note from the requester.
    pub note: Option<String>,
    /// Current status.
    pub status: RequestStatus,
    /// Who approved, denied, or cancelled the request.
    pub decided_by: Option<EmployeeId>,
    /// When the request left `Pending`.
    pub decided_at: Option<DateTime<Utc>>,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl TimeOffRequest {
    /// The stored dates as a validated range.
    pub fn range(&self) -> Result<DateRange, RangeError> {
        DateRange::new(self.start_date, self.end_date)
    }
}

/// A validated state transition with its audit data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleAction {
    /// Pending → Approved.
    Approve {
        /// The new status after approval.
        new_status: RequestStatus,
        /// The administrator approving the request.
        decided_by: EmployeeId,
        /// When the request was approved.
        decided_at: DateTime<Utc>,
    },
    /// Pending → Denied.
    Deny {
        /// The new status after denial.
        new_status: RequestStatus,
        /// The administrator denying the request.
        decided_by: EmployeeId,
        /// When the request was denied.
        decided_at: DateTime<Utc>,
    },
    /// Pending → Cancelled.
    Cancel {
        /// The new status after cancellation.
        new_status: RequestStatus,
        /// The requester withdrawing the request.
        cancelled_by: EmployeeId,
        /// When the request was cancelled.
        cancelled_at: DateTime<Utc>,
    },
}

impl LifecycleAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub const fn new_status(&self) -> RequestStatus {
        match self {
            Self::Approve { new_status, .. }
            | Self::Deny { new_status, .. }
            | Self::Cancel { new_status, .. } => *new_status,
        }
    }

    /// Who performed the transition.
    #[must_use]
    pub const fn actor(&self) -> EmployeeId {
        match self {
            Self::Approve { decided_by, .. } | Self::Deny { decided_by, .. } => *decided_by,
            Self::Cancel { cancelled_by, .. } => *cancelled_by,
        }
    }

    /// When the transition happened.
    #[must_use]
    pub const fn at(&self) -> DateTime<Utc> {
        match self {
            Self::Approve { decided_at, .. } | Self::Deny { decided_at, .. } => *decided_at,
            Self::Cancel { cancelled_at, .. } => *cancelled_at,
        }
    }
}

//! Ledger domain types.

use chrono::{DateTime, Utc};
use furlough_shared::types::{EmployeeId, MovementId, RequestId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementKind {
    /// Days taken by an approved request.
    Debit,
    /// Days returned when an approved request is reversed.
    Credit,
    /// Administrative change of the balance.
    Adjustment,
}

impl MovementKind {
    /// Returns the string representation of the kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "debit",
            Self::Credit => "credit",
            Self::Adjustment => "adjustment",
        }
    }

    /// Parses a kind from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "debit" => Some(Self::Debit),
            "credit" => Some(Self::Credit),
            "adjustment" => Some(Self::Adjustment),
            _ => None,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded change to an employee's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerMovement {
    /// Movement ID.
    pub id: MovementId,
    /// Employee whose balance changed.
    pub employee_id: EmployeeId,
    /// What caused the change.
    pub kind: MovementKind,
    /// Signed delta applied to `days_remaining`.
    pub delta: i32,
    /// Request that caused a debit or credit.
    pub request_id: Option<RequestId>,
    /// Person who triggered the change.
    pub actor_id: Option<EmployeeId>,
    /// Free-text memo.
    pub memo: Option<String>,
    /// Balance after the change was applied.
    pub balance_after: i32,
    /// When the change was recorded.
    pub created_at: DateTime<Utc>,
}

/// Current balance of one employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    /// Employee ID.
    pub employee_id: EmployeeId,
    /// Whole days remaining.
    pub days_remaining: i32,
    /// Incremented on every mutation.
    pub version: i64,
}

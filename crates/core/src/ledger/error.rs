//! Ledger error types.

use furlough_shared::types::{EmployeeId, RequestId};
use thiserror::Error;

/// Errors that can occur during balance ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The debit would take the balance below the configured floor.
    #[error("Insufficient balance: requested {requested} day(s), {remaining} remaining")]
    InsufficientBalance {
        /// Days the debit asked for.
        requested: i32,
        /// Days remaining before the debit.
        remaining: i32,
    },

    /// A debit for this request has already been recorded.
    #[error("Request {0} has already been debited")]
    AlreadyDebited(RequestId),

    /// A credit for this request has already been recorded.
    #[error("Request {0} has already been credited")]
    AlreadyCredited(RequestId),

    /// A credit names a request that was never debited.
    #[error("Request {0} has no debit to reverse")]
    NoPriorDebit(RequestId),

    /// A credit does not match the amount of the debit it reverses.
    #[error("Credit of {requested} day(s) does not match debit of {debited} day(s)")]
    CreditMismatch {
        /// Amount of the original debit.
        debited: i32,
        /// Amount of the attempted credit.
        requested: i32,
    },

    /// Debits and credits move a strictly positive number of days.
    #[error("Amount must be positive, got {0}")]
    NonPositiveAmount(i32),

    /// The balance would leave the representable range.
    #[error("Balance arithmetic overflow")]
    Overflow,

    /// No balance row exists for the employee.
    #[error("Employee {0} not found")]
    EmployeeNotFound(EmployeeId),

    /// The balance changed between read and write.
    #[error("Balance of employee {0} was modified concurrently")]
    ConcurrentUpdate(EmployeeId),

    /// Store failure; the operation may be retried.
    #[error("Database error: {0}")]
    Database(String),
}

impl LedgerError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount(_) | Self::CreditMismatch { .. } => 400,
            Self::EmployeeNotFound(_) => 404,
            Self::AlreadyDebited(_)
            | Self::AlreadyCredited(_)
            | Self::NoPriorDebit(_)
            | Self::ConcurrentUpdate(_) => 409,
            Self::InsufficientBalance { .. } | Self::Overflow => 422,
            Self::Database(_) => 503,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            Self::AlreadyDebited(_) => "ALREADY_DEBITED",
            Self::AlreadyCredited(_) => "ALREADY_CREDITED",
            Self::NoPriorDebit(_) => "NO_PRIOR_DEBIT",
            Self::CreditMismatch { .. } => "CREDIT_MISMATCH",
            Self::NonPositiveAmount(_) => "NON_POSITIVE_AMOUNT",
            Self::Overflow => "BALANCE_OVERFLOW",
            Self::EmployeeNotFound(_) => "EMPLOYEE_NOT_FOUND",
            Self::ConcurrentUpdate(_) => "CONCURRENT_UPDATE",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns true if retrying the same operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Database(_) | Self::ConcurrentUpdate(_))
    }
}

//! Balance ledger rules.
//!
//! Each employee has one whole-day balance. Every change to it is recorded
//! as a movement attributed to its cause: a request (debit on approval,
//! credit on administrative reversal) or an administrator (adjustment).
//!
//! This module holds the pure rules; the atomic read-modify-write lives in
//! the store.

pub mod error;
pub mod policy;
pub mod types;

#[cfg(test)]
mod policy_props;

pub use error::LedgerError;
pub use policy::LedgerPolicy;
pub use types::{BalanceSnapshot, LedgerMovement, MovementKind};

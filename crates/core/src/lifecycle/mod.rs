//! Time-off request lifecycle.
//!
//! This module implements the request state machine:
//!
//! ```text
//! PENDING ──approve──▶ APPROVED
//!    │ ╲──deny─────▶ DENIED
//!    ╰────cancel───▶ CANCELLED
//! ```
//!
//! All three outcomes are terminal. Approval re-checks blackouts and
//! produces the debit the store must apply in the same transaction.
//!
//! # Modules
//!
//! - `types` - Request status, request record, and transition actions
//! - `error` - Lifecycle error types
//! - `service` - Transition validation

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LifecycleError;
pub use service::{ApprovalPlan, LifecycleService};
pub use types::{LifecycleAction, RequestStatus, TimeOffRequest};

//! Core business logic for Furlough.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state transitions live here; the
//! `furlough-db` crate wraps them in transactions.
//!
//! # Modules
//!
//! - `calendar` - Inclusive date ranges and the end-exclusive export boundary
//! - `ledger` - Balance policy and ledger movement types
//! - `blackout` - Per-location blackout ranges and conflict queries
//! - `lifecycle` - The time-off request state machine
//! - `export` - iCalendar rendering of approved absences

pub mod blackout;
pub mod calendar;
pub mod export;
pub mod ledger;
pub mod lifecycle;

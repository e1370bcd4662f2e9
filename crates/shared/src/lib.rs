//! Shared types, errors, and configuration for Furlough.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - The closed set of company locations
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, CalendarConfig, LedgerConfig};
pub use error::{AppError, AppResult};
pub use types::Location;

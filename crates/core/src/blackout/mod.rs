//! Per-location blackout ranges.
//!
//! A blackout blocks approvals for its location while it overlaps a
//! request. Overlapping blackouts for the same location are allowed and are
//! never merged.

pub mod error;
pub mod registry;

pub use error::BlackoutError;
pub use registry::{BlackoutRange, BlackoutRegistry};

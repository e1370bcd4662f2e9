//! Calendar date ranges.
//!
//! All dates are timezone-less calendar dates. The domain model is
//! end-inclusive; only the export boundary converts to end-exclusive.

pub mod range;

#[cfg(test)]
mod range_props;

pub use range::{DateRange, RangeError, export_end_exclusive, inclusive_day_count};

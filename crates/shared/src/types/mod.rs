//! Common types used across the application.

pub mod id;
pub mod location;


pub use id::*;
pub use location::Location;

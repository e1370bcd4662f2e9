//! API route definitions.

use axum::Router;
use furlough_shared::types::Location;

use crate::{ApiError, AppState};

pub mod blackouts;
pub mod calendar;
pub mod employees;
pub mod health;
pub mod requests;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(employees::routes())
        .merge(requests::routes())
        .merge(blackouts::routes())
        .merge(calendar::routes())
}

/// Resolves a location key taken from the URL path.
fn path_location(key: &str) -> Result<Location, ApiError> {
    Location::parse(key).ok_or_else(|| ApiError::unknown_location(key))
}

/// Resolves a location key taken from a request body.
fn body_location(key: &str) -> Result<Location, ApiError> {
    Location::parse(key).ok_or_else(|| {
        ApiError::validation(format!(
            "Unknown location '{key}', expected one of {}",
            Location::ALL.map(|l| l.as_str()).join(", ")
        ))
    })
}

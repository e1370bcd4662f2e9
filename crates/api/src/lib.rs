//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - JSON request and response types
//! - Mapping of domain errors to HTTP responses
//!
//! There is no session handling: every call that acts on behalf of someone
//! names that person explicitly in its body.

pub mod error;
pub mod routes;

use axum::Router;
use furlough_core::export::CalendarExporter;
use furlough_core::ledger::LedgerPolicy;
use furlough_shared::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Floor policy applied to approval debits.
    pub ledger_policy: LedgerPolicy,
    /// Calendar feed renderer.
    pub exporter: Arc<CalendarExporter>,
}

impl AppState {
    /// Builds the state from a connection and the loaded configuration.
    #[must_use]
    pub fn new(db: DatabaseConnection, config: &AppConfig) -> Self {
        Self {
            db: Arc::new(db),
            ledger_policy: LedgerPolicy::from(config.ledger),
            exporter: Arc::new(CalendarExporter::new(config.calendar.product_name.clone())),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

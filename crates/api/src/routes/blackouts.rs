//! Blackout administration routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use furlough_db::repositories::BlackoutRepository;
use furlough_shared::types::BlackoutId;

use super::path_location;
use crate::{ApiError, AppState};

/// Creates the blackout routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/locations/{location}/blackouts",
            get(list_blackouts).post(create_blackout),
        )
        .route("/blackouts/{id}", delete(delete_blackout))
}

/// Request body for adding a blackout.
#[derive(Debug, Deserialize)]
pub struct CreateBlackoutRequest {
    /// First blocked day (YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// Last blocked day, inclusive (YYYY-MM-DD).
    pub end_date: NaiveDate,
    /// Optional reason.
    pub reason: Option<String>,
}

/// GET `/locations/{location}/blackouts` - Blackouts by start date.
async fn list_blackouts(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let location = path_location(&location)?;
    let repo = BlackoutRepository::new((*state.db).clone());
    let blackouts = repo.list(location).await?;
    Ok(Json(json!({ "location": location, "blackouts": blackouts })))
}

/// POST `/locations/{location}/blackouts` - Add a blackout.
///
/// Only approvals decided after this point are affected.
async fn create_blackout(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Json(payload): Json<CreateBlackoutRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = path_location(&location)?;
    let repo = BlackoutRepository::new((*state.db).clone());
    let blackout = repo
        .add(location, payload.start_date, payload.end_date, payload.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(blackout)))
}

/// DELETE `/blackouts/{id}` - Remove a blackout.
async fn delete_blackout(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = BlackoutRepository::new((*state.db).clone());
    repo.remove(BlackoutId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

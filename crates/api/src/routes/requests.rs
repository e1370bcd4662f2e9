//! Time-off request routes: submission, decision, cancellation, listings.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use furlough_core::lifecycle::{RequestStatus, TimeOffRequest};
use furlough_db::repositories::{RequestWithEmployee, TimeOffRepository};
use furlough_shared::types::{EmployeeId, RequestId};

use crate::{ApiError, AppState};

/// Creates the request routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/requests", get(list_requests).post(submit_request))
        .route("/requests/{id}", get(get_request))
        .route("/requests/{id}/decision", post(decide_request))
        .route("/requests/{id}/cancel", post(cancel_request))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for submitting a request.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Requesting employee.
    pub employee_id: Uuid,
    /// First day off (YYYY-MM-DD).
    pub start_date: NaiveDate,
    /// Last day off, inclusive (YYYY-MM-DD).
    pub end_date: NaiveDate,
    /// Optional note.
    pub note: Option<String>,
}

/// Request body for an approve/deny decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// Administrator deciding.
    pub decider_id: Uuid,
    /// `true` approves, `false` denies.
    pub approve: bool,
}

/// Request body for a cancellation.
#[derive(Debug, Deserialize)]
pub struct CancelRequest {
    /// Must be the employee who submitted the request.
    pub requester_id: Uuid,
}

/// Query parameters for the review list.
#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    /// Only this status; without it everything but cancelled requests.
    pub status: Option<String>,
}

/// Review list item.
#[derive(Debug, Serialize)]
pub struct ReviewItem {
    /// The request.
    #[serde(flatten)]
    pub request: TimeOffRequest,
    /// Requester's name.
    pub employee_name: String,
}

impl From<RequestWithEmployee> for ReviewItem {
    fn from(value: RequestWithEmployee) -> Self {
        Self {
            request: value.request,
            employee_name: value.employee_name,
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/requests` - Submit a request; it starts `PENDING`.
async fn submit_request(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TimeOffRepository::new((*state.db).clone(), state.ledger_policy);
    let request = repo
        .submit(
            EmployeeId::from_uuid(payload.employee_id),
            payload.start_date,
            payload.end_date,
            payload.note,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET `/requests` - Review list by start date.
async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            RequestStatus::parse(s)
                .ok_or_else(|| ApiError::validation(format!("Unknown status '{s}'")))
        })
        .transpose()?;

    let repo = TimeOffRepository::new((*state.db).clone(), state.ledger_policy);
    let requests: Vec<ReviewItem> = repo
        .list_for_review(status)
        .await?
        .into_iter()
        .map(ReviewItem::from)
        .collect();
    Ok(Json(json!({ "requests": requests })))
}

/// GET `/requests/{id}` - One request.
async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TimeOffRepository::new((*state.db).clone(), state.ledger_policy);
    let request = repo.find_by_id(RequestId::from_uuid(id)).await?;
    Ok(Json(request))
}

/// POST `/requests/{id}/decision` - Approve (debiting the balance) or deny.
async fn decide_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TimeOffRepository::new((*state.db).clone(), state.ledger_policy);
    let request_id = RequestId::from_uuid(id);
    let decider = EmployeeId::from_uuid(payload.decider_id);

    let request = if payload.approve {
        repo.approve(request_id, decider).await?
    } else {
        repo.deny(request_id, decider).await?
    };

    info!(request_id = %request_id, status = %request.status, "Decision recorded");
    Ok(Json(request))
}

/// POST `/requests/{id}/cancel` - Withdraw a pending request.
async fn cancel_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CancelRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TimeOffRepository::new((*state.db).clone(), state.ledger_policy);
    let request = repo
        .cancel(
            RequestId::from_uuid(id),
            EmployeeId::from_uuid(payload.requester_id),
        )
        .await?;
    Ok(Json(request))
}

//! Employee directory, balance and ledger routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use furlough_core::ledger::LedgerMovement;
use furlough_db::entities::employees;
use furlough_db::repositories::{
    CreateEmployeeInput, EmployeeRepository, EmployeeWithBalance, LedgerRepository,
    TimeOffRepository,
};
use furlough_shared::types::{EmployeeId, Location, RequestId};

use super::body_location;
use crate::{ApiError, AppState};

/// Creates the employee routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/{id}", get(get_employee))
        .route("/employees/{id}/location", patch(update_location))
        .route("/employees/{id}/balance", get(get_balance).put(set_balance))
        .route("/employees/{id}/ledger", get(list_movements))
        .route("/employees/{id}/ledger/credits", post(credit_request))
        .route("/employees/{id}/requests", get(list_employee_requests))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an employee.
#[derive(Debug, Deserialize)]
pub struct CreateEmployeeRequest {
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Location key, e.g. `CompanyA`.
    pub home_location: String,
}

/// Request body for moving an employee.
#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    /// New location key.
    pub home_location: String,
}

/// Query parameters for listing employees.
#[derive(Debug, Deserialize)]
pub struct ListEmployeesQuery {
    /// Restrict to one location.
    pub location: Option<String>,
}

/// Request body for the administrative balance edit.
#[derive(Debug, Deserialize)]
pub struct SetBalanceRequest {
    /// New balance in whole days.
    pub days_remaining: i32,
    /// Administrator making the change.
    pub actor_id: Uuid,
    /// Optional memo for the ledger.
    pub memo: Option<String>,
}

/// Request body for crediting back an approved request.
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    /// The approved request whose debit is reversed.
    pub request_id: Uuid,
    /// Days to credit; must equal the original debit.
    pub days: i32,
    /// Administrator making the change.
    pub actor_id: Uuid,
    /// Optional memo for the ledger.
    pub memo: Option<String>,
}

/// Query parameters for an employee's request list.
#[derive(Debug, Deserialize)]
pub struct EmployeeRequestsQuery {
    /// Maximum number of requests (default 5).
    pub limit: Option<u64>,
}

/// Response for an employee.
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    /// Employee ID.
    pub id: Uuid,
    /// Display name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Location key.
    pub home_location: Location,
    /// Days remaining.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i32>,
    /// Created at timestamp.
    pub created_at: DateTime<Utc>,
}

impl EmployeeResponse {
    fn from_model(model: employees::Model, days_remaining: Option<i32>) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            home_location: model.home_location.into(),
            days_remaining,
            created_at: model.created_at,
        }
    }
}

impl From<EmployeeWithBalance> for EmployeeResponse {
    fn from(value: EmployeeWithBalance) -> Self {
        Self::from_model(value.employee, Some(value.days_remaining))
    }
}

/// Response for a balance.
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    /// Employee ID.
    pub employee_id: EmployeeId,
    /// Days remaining.
    pub days_remaining: i32,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// POST `/employees` - Create an employee with a zero balance.
async fn create_employee(
    State(state): State<AppState>,
    Json(payload): Json<CreateEmployeeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let home_location = body_location(&payload.home_location)?;
    let repo = EmployeeRepository::new((*state.db).clone());

    let employee = repo
        .create(CreateEmployeeInput {
            full_name: payload.full_name,
            email: payload.email,
            home_location,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(EmployeeResponse::from_model(employee, Some(0))),
    ))
}

/// GET `/employees` - List employees with balances, by name.
async fn list_employees(
    State(state): State<AppState>,
    Query(query): Query<ListEmployeesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let location = query.location.as_deref().map(body_location).transpose()?;
    let repo = EmployeeRepository::new((*state.db).clone());

    let employees: Vec<EmployeeResponse> = repo
        .list(location)
        .await?
        .into_iter()
        .map(EmployeeResponse::from)
        .collect();

    Ok(Json(json!({ "employees": employees })))
}

/// GET `/employees/{id}` - Get one employee with balance.
async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = EmployeeRepository::new((*state.db).clone());
    let employee = repo.find_with_balance(EmployeeId::from_uuid(id)).await?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// PATCH `/employees/{id}/location` - Move an employee.
async fn update_location(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateLocationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = body_location(&payload.home_location)?;
    let repo = EmployeeRepository::new((*state.db).clone());
    let employee = repo
        .update_location(EmployeeId::from_uuid(id), location)
        .await?;
    Ok(Json(EmployeeResponse::from_model(employee, None)))
}

/// GET `/employees/{id}/balance` - Current balance.
async fn get_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = LedgerRepository::new((*state.db).clone(), state.ledger_policy);
    let balance = ledger.balance_of(EmployeeId::from_uuid(id)).await?;
    Ok(Json(BalanceResponse {
        employee_id: balance.employee_id,
        days_remaining: balance.days_remaining,
    }))
}

/// PUT `/employees/{id}/balance` - Set the balance directly.
async fn set_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetBalanceRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = LedgerRepository::new((*state.db).clone(), state.ledger_policy);
    let movement = ledger
        .set_balance(
            EmployeeId::from_uuid(id),
            payload.days_remaining,
            EmployeeId::from_uuid(payload.actor_id),
            payload.memo,
        )
        .await?;

    Ok(Json(BalanceResponse {
        employee_id: movement.employee_id,
        days_remaining: movement.balance_after,
    }))
}

/// GET `/employees/{id}/ledger` - Balance movements, oldest first.
async fn list_movements(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = LedgerRepository::new((*state.db).clone(), state.ledger_policy);
    let movements: Vec<LedgerMovement> = ledger.movements(EmployeeId::from_uuid(id)).await?;
    Ok(Json(json!({ "movements": movements })))
}

/// POST `/employees/{id}/ledger/credits` - Reverse the debit of an approved request.
///
/// The request itself stays `APPROVED`; only the balance moves.
async fn credit_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CreditRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let ledger = LedgerRepository::new((*state.db).clone(), state.ledger_policy);
    let movement = ledger
        .credit(
            EmployeeId::from_uuid(id),
            payload.days,
            RequestId::from_uuid(payload.request_id),
            EmployeeId::from_uuid(payload.actor_id),
            payload.memo,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// GET `/employees/{id}/requests` - The employee's requests by start date.
async fn list_employee_requests(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<EmployeeRequestsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = TimeOffRepository::new((*state.db).clone(), state.ledger_policy);
    let requests = repo
        .list_for_employee(EmployeeId::from_uuid(id), query.limit)
        .await?;
    Ok(Json(json!({ "requests": requests })))
}

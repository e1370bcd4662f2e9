//! Time-off request repository.
//!
//! Persists the lifecycle transitions decided by
//! [`LifecycleService`]. Every transition is a conditional update that only
//! matches a `pending` row, so two deciders racing on one request cannot
//! both win. Approval additionally debits the ledger inside the same
//! database transaction.

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use furlough_core::blackout::{BlackoutError, BlackoutRegistry};
use furlough_core::calendar::DateRange;
use furlough_core::ledger::LedgerPolicy;
use furlough_core::lifecycle::{
    LifecycleAction, LifecycleError, LifecycleService, RequestStatus, TimeOffRequest,
};
use furlough_shared::types::{EmployeeId, Location, RequestId};

use crate::entities::{employees, sea_orm_active_enums, time_off_requests};

use super::blackout::overlapping;
use super::ledger::LedgerRepository;

/// Default number of requests returned by [`TimeOffRepository::list_for_employee`].
pub const DEFAULT_EMPLOYEE_LIMIT: u64 = 5;

/// Upper bound on [`TimeOffRepository::list_for_employee`].
pub const MAX_EMPLOYEE_LIMIT: u64 = 100;

/// Request with the requester's display name, for the review list.
#[derive(Debug, Clone)]
pub struct RequestWithEmployee {
    /// The request.
    pub request: TimeOffRequest,
    /// Requester's full name.
    pub employee_name: String,
}

/// Time-off request repository.
#[derive(Debug, Clone)]
pub struct TimeOffRepository {
    db: DatabaseConnection,
    ledger: LedgerRepository,
}

impl TimeOffRepository {
    /// Creates a new request repository; approvals debit under `policy`.
    #[must_use]
    pub fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self {
            ledger: LedgerRepository::new(db.clone(), policy),
            db,
        }
    }

    /// Submits a new request in `Pending`.
    ///
    /// The location is taken from the employee's current home location. No
    /// ledger effect; nothing is stored on failure.
    ///
    /// # Errors
    ///
    /// * `Range` if `end < start`
    /// * `EmployeeNotFound` if the employee does not exist
    /// * `BlackoutConflict` if a blackout at the location overlaps the dates
    pub async fn submit(
        &self,
        employee_id: EmployeeId,
        start: NaiveDate,
        end: NaiveDate,
        note: Option<String>,
    ) -> Result<TimeOffRequest, LifecycleError> {
        let range = DateRange::new(start, end)?;

        let employee = employees::Entity::find_by_id(employee_id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or(LifecycleError::EmployeeNotFound(employee_id))?;
        let location: Location = employee.home_location.into();

        let blackouts = overlapping(&self.db, location, &range)
            .await
            .map_err(blackout_error)?;
        let request = LifecycleService::plan_submission(
            employee_id,
            location,
            start,
            end,
            note,
            &BlackoutRegistry::new(&blackouts),
        )
        .inspect_err(|e| {
            tracing::info!(employee_id = %employee_id, error = %e, "Submission rejected");
        })?;

        time_off_requests::ActiveModel {
            id: Set(request.id.into_inner()),
            employee_id: Set(employee_id.into_inner()),
            location: Set(location.into()),
            start_date: Set(request.start_date),
            end_date: Set(request.end_date),
            days_requested: Set(request.days_requested),
            note: Set(request.note.clone()),
            status: Set(request.status.into()),
            decided_by: Set(None),
            decided_at: Set(None),
            created_at: Set(request.created_at),
            updated_at: Set(request.updated_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        tracing::info!(
            request_id = %request.id,
            employee_id = %employee_id,
            location = %location,
            days = request.days_requested,
            "Time-off request submitted"
        );
        Ok(request)
    }

    /// Approves a pending request and debits the employee's balance.
    ///
    /// Runs as one database transaction: load, status check, blackout
    /// re-check, conditional claim of the row, ledger debit. If any step
    /// fails nothing is written; the request stays `Pending` and the balance
    /// is unchanged.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if no request has this ID
    /// * `InvalidTransition` if the request is not `Pending`, including when
    ///   a concurrent approval won the race
    /// * `EmployeeNotFound` if `decided_by` is not an employee
    /// * `BlackoutConflict` if a blackout now overlaps the request
    /// * `Ledger(InsufficientBalance)` / `Ledger(AlreadyDebited)` from the debit
    pub async fn approve(
        &self,
        request_id: RequestId,
        decided_by: EmployeeId,
    ) -> Result<TimeOffRequest, LifecycleError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        let request = load_request(&txn, request_id).await?;
        let approved = self.approve_loaded(&txn, request, decided_by).await?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(
            request_id = %request_id,
            employee_id = %approved.employee_id,
            decided_by = %decided_by,
            days = approved.days_requested,
            "Time-off request approved"
        );
        Ok(approved)
    }

    /// Approval steps after the request row was read.
    ///
    /// `request` may already be stale; the conditional claim is what decides
    /// whether this caller wins.
    async fn approve_loaded<C: ConnectionTrait>(
        &self,
        conn: &C,
        request: TimeOffRequest,
        decided_by: EmployeeId,
    ) -> Result<TimeOffRequest, LifecycleError> {
        let request_id = request.id;
        ensure_employee(conn, decided_by).await?;

        let range = request.range()?;
        let blackouts = overlapping(conn, request.location, &range)
            .await
            .map_err(blackout_error)?;
        let plan = LifecycleService::plan_approval(
            &request,
            decided_by,
            &BlackoutRegistry::new(&blackouts),
        )?;

        claim(conn, request_id, &plan.action, Some(plan.days)).await?;

        if let Err(e) = self
            .ledger
            .debit_in(conn, plan.employee_id, plan.days, request_id, decided_by)
            .await
        {
            tracing::warn!(request_id = %request_id, error = %e, "Approval rolled back");
            return Err(e.into());
        }

        Ok(applied(request, &plan.action, Some(plan.days)))
    }

    /// Denies a pending request. The ledger is not touched.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if no request has this ID
    /// * `InvalidTransition` if the request is not `Pending`
    /// * `EmployeeNotFound` if `decided_by` is not an employee
    pub async fn deny(
        &self,
        request_id: RequestId,
        decided_by: EmployeeId,
    ) -> Result<TimeOffRequest, LifecycleError> {
        let request = load_request(&self.db, request_id).await?;
        let action = LifecycleService::deny(request.status, decided_by)?;
        ensure_employee(&self.db, decided_by).await?;
        claim(&self.db, request_id, &action, None).await?;

        tracing::info!(request_id = %request_id, decided_by = %decided_by, "Time-off request denied");
        Ok(applied(request, &action, None))
    }

    /// Cancels a pending request on behalf of its requester. The ledger is
    /// not touched.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if no request has this ID
    /// * `InvalidTransition` if the request is not `Pending`
    /// * `NotRequester` if `requester` did not submit the request
    pub async fn cancel(
        &self,
        request_id: RequestId,
        requester: EmployeeId,
    ) -> Result<TimeOffRequest, LifecycleError> {
        let request = load_request(&self.db, request_id).await?;
        let action = LifecycleService::cancel(&request, requester)?;
        claim(&self.db, request_id, &action, None).await?;

        tracing::info!(request_id = %request_id, "Time-off request cancelled");
        Ok(applied(request, &action, None))
    }

    /// Finds a request by ID.
    ///
    /// # Errors
    ///
    /// Returns `RequestNotFound` if no request has this ID.
    pub async fn find_by_id(&self, request_id: RequestId) -> Result<TimeOffRequest, LifecycleError> {
        load_request(&self.db, request_id).await
    }

    /// An employee's requests by start date, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if the employee does not exist.
    pub async fn list_for_employee(
        &self,
        employee_id: EmployeeId,
        limit: Option<u64>,
    ) -> Result<Vec<TimeOffRequest>, LifecycleError> {
        ensure_employee(&self.db, employee_id).await?;

        let limit = limit
            .unwrap_or(DEFAULT_EMPLOYEE_LIMIT)
            .clamp(1, MAX_EMPLOYEE_LIMIT);
        let rows = time_off_requests::Entity::find()
            .filter(time_off_requests::Column::EmployeeId.eq(employee_id.into_inner()))
            .order_by_asc(time_off_requests::Column::StartDate)
            .order_by_asc(time_off_requests::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(to_request).collect())
    }

    /// Requests for the review list, by start date.
    ///
    /// With no status filter, cancelled requests are left out.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list_for_review(
        &self,
        status: Option<RequestStatus>,
    ) -> Result<Vec<RequestWithEmployee>, LifecycleError> {
        let query = time_off_requests::Entity::find();
        let query = match status {
            Some(status) => query.filter(
                time_off_requests::Column::Status.eq(sea_orm_active_enums::RequestStatus::from(status)),
            ),
            None => query.filter(
                time_off_requests::Column::Status
                    .ne(sea_orm_active_enums::RequestStatus::Cancelled),
            ),
        };

        let rows = query
            .order_by_asc(time_off_requests::Column::StartDate)
            .order_by_asc(time_off_requests::Column::Id)
            .find_also_related(employees::Entity)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|(request, employee)| RequestWithEmployee {
                request: to_request(request),
                employee_name: employee.map(|e| e.full_name).unwrap_or_default(),
            })
            .collect())
    }
}

/// Fails with `EmployeeNotFound` unless `employee_id` names an employee.
async fn ensure_employee<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
) -> Result<(), LifecycleError> {
    employees::Entity::find_by_id(employee_id.into_inner())
        .one(conn)
        .await
        .map_err(db_error)?
        .map(|_| ())
        .ok_or(LifecycleError::EmployeeNotFound(employee_id))
}

async fn load_request<C: ConnectionTrait>(
    conn: &C,
    request_id: RequestId,
) -> Result<TimeOffRequest, LifecycleError> {
    time_off_requests::Entity::find_by_id(request_id.into_inner())
        .one(conn)
        .await
        .map_err(db_error)?
        .map(to_request)
        .ok_or(LifecycleError::RequestNotFound(request_id))
}

/// Moves the row out of `pending` if it is still there.
///
/// A zero row count means another writer got there first; the status it
/// left behind is reported as the transition's origin.
async fn claim<C: ConnectionTrait>(
    conn: &C,
    request_id: RequestId,
    action: &LifecycleAction,
    days: Option<i32>,
) -> Result<(), LifecycleError> {
    let to = action.new_status();
    let mut update = time_off_requests::Entity::update_many()
        .col_expr(
            time_off_requests::Column::Status,
            Expr::value(sea_orm_active_enums::RequestStatus::from(to)),
        )
        .col_expr(
            time_off_requests::Column::DecidedBy,
            Expr::value(Some(action.actor().into_inner())),
        )
        .col_expr(time_off_requests::Column::DecidedAt, Expr::value(Some(action.at())))
        .col_expr(time_off_requests::Column::UpdatedAt, Expr::value(action.at()))
        .filter(time_off_requests::Column::Id.eq(request_id.into_inner()))
        .filter(
            time_off_requests::Column::Status.eq(sea_orm_active_enums::RequestStatus::Pending),
        );
    if let Some(days) = days {
        update = update.col_expr(time_off_requests::Column::DaysRequested, Expr::value(days));
    }

    let result = update.exec(conn).await.map_err(db_error)?;
    if result.rows_affected == 0 {
        let current = load_request(conn, request_id).await?;
        tracing::warn!(
            request_id = %request_id,
            from = %current.status,
            to = %to,
            "Lost race on request transition"
        );
        return Err(LifecycleError::InvalidTransition {
            from: current.status,
            to,
        });
    }
    Ok(())
}

/// The request as it reads after `action` was stored.
fn applied(mut request: TimeOffRequest, action: &LifecycleAction, days: Option<i32>) -> TimeOffRequest {
    request.status = action.new_status();
    request.decided_by = Some(action.actor());
    request.decided_at = Some(action.at());
    request.updated_at = action.at();
    if let Some(days) = days {
        request.days_requested = days;
    }
    request
}

pub(crate) fn to_request(model: time_off_requests::Model) -> TimeOffRequest {
    TimeOffRequest {
        id: RequestId::from_uuid(model.id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        location: model.location.into(),
        start_date: model.start_date,
        end_date: model.end_date,
        days_requested: model.days_requested,
        note: model.note,
        status: model.status.into(),
        decided_by: model.decided_by.map(EmployeeId::from_uuid),
        decided_at: model.decided_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn blackout_error(e: BlackoutError) -> LifecycleError {
    match e {
        BlackoutError::Range(e) => LifecycleError::Range(e),
        other => LifecycleError::Database(other.to_string()),
    }
}

#[allow(clippy::needless_pass_by_value)]
fn db_error(e: DbErr) -> LifecycleError {
    LifecycleError::Database(e.to_string())
}

#[cfg(test)]
#[path = "time_off_tests.rs"]
mod tests;

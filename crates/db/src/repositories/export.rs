//! Read model for the calendar feed.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};

use furlough_core::export::ApprovedAbsence;
use furlough_shared::types::{EmployeeId, Location, RequestId};

use crate::entities::{employees, sea_orm_active_enums, time_off_requests};

/// Reads approved absences for export. Takes no locks.
#[derive(Debug, Clone)]
pub struct ExportRepository {
    db: DatabaseConnection,
}

impl ExportRepository {
    /// Creates a new export repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Approved requests filed under `location`, joined with employee names.
    ///
    /// Rows whose employee cannot be found come back with an empty name; the
    /// exporter skips them.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn approved_absences(&self, location: Location) -> Result<Vec<ApprovedAbsence>, DbErr> {
        let rows = time_off_requests::Entity::find()
            .filter(
                time_off_requests::Column::Location
                    .eq(sea_orm_active_enums::Location::from(location)),
            )
            .filter(
                time_off_requests::Column::Status
                    .eq(sea_orm_active_enums::RequestStatus::Approved),
            )
            .order_by_asc(time_off_requests::Column::StartDate)
            .find_also_related(employees::Entity)
            .all(&self.db)
            .await?;

        let absences: Vec<ApprovedAbsence> = rows
            .into_iter()
            .map(|(request, employee)| {
                if employee.is_none() {
                    tracing::warn!(
                        request_id = %request.id,
                        employee_id = %EmployeeId::from_uuid(request.employee_id),
                        "Approved request has no employee record"
                    );
                }
                ApprovedAbsence {
                    request_id: RequestId::from_uuid(request.id),
                    employee_name: employee.map(|e| e.full_name).unwrap_or_default(),
                    start_date: request.start_date,
                    end_date: request.end_date,
                    note: request.note,
                    decided_at: request.decided_at,
                }
            })
            .collect();

        tracing::debug!(location = %location, count = absences.len(), "Loaded approved absences");
        Ok(absences)
    }
}

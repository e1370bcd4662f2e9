//! Employee directory repository.
//!
//! Employees are created together with a zero balance row and are never
//! deleted.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr, TransactionTrait,
};

use furlough_shared::{AppError, AppResult};
use furlough_shared::types::{EmployeeId, Location};

use crate::entities::{employees, pto_balances};

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct CreateEmployeeInput {
    /// Display name.
    pub full_name: String,
    /// Contact email, unique across employees.
    pub email: String,
    /// Home location.
    pub home_location: Location,
}

/// Employee with current balance.
#[derive(Debug, Clone)]
pub struct EmployeeWithBalance {
    /// The employee record.
    pub employee: employees::Model,
    /// Days remaining (zero if no balance row exists).
    pub days_remaining: i32,
}

/// Employee repository.
#[derive(Debug, Clone)]
pub struct EmployeeRepository {
    db: DatabaseConnection,
}

impl EmployeeRepository {
    /// Creates a new employee repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an employee and its balance row in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a blank name or email, `Conflict` if the
    /// email is taken, `Database` on store failure.
    pub async fn create(&self, input: CreateEmployeeInput) -> AppResult<employees::Model> {
        let full_name = input.full_name.trim().to_string();
        let email = input.email.trim().to_lowercase();
        if full_name.is_empty() {
            return Err(AppError::Validation("full_name must not be blank".to_string()));
        }
        if email.is_empty() {
            return Err(AppError::Validation("email must not be blank".to_string()));
        }

        let txn = self.db.begin().await.map_err(db_error)?;

        let now = Utc::now();
        let id = EmployeeId::new().into_inner();
        let employee = employees::ActiveModel {
            id: Set(id),
            full_name: Set(full_name),
            email: Set(email.clone()),
            home_location: Set(input.home_location.into()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict(format!("email '{email}' is already registered"))
            }
            _ => db_error(e),
        })?;

        pto_balances::ActiveModel {
            employee_id: Set(id),
            days_remaining: Set(0),
            version: Set(0),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_error)?;

        txn.commit().await.map_err(db_error)?;

        tracing::info!(employee_id = %id, location = %input.home_location, "Employee created");
        Ok(employee)
    }

    /// Finds an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: EmployeeId) -> Result<Option<employees::Model>, DbErr> {
        employees::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
    }

    /// Finds an employee together with the current balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub async fn find_with_balance(&self, id: EmployeeId) -> AppResult<EmployeeWithBalance> {
        let (employee, balance) = employees::Entity::find_by_id(id.into_inner())
            .find_also_related(pto_balances::Entity)
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound(format!("employee {id}")))?;

        Ok(EmployeeWithBalance {
            employee,
            days_remaining: balance.map_or(0, |b| b.days_remaining),
        })
    }

    /// Lists employees by name, optionally restricted to one location.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(
        &self,
        location: Option<Location>,
    ) -> AppResult<Vec<EmployeeWithBalance>> {
        let mut query = employees::Entity::find();
        if let Some(location) = location {
            query = query.filter(
                employees::Column::HomeLocation
                    .eq(crate::entities::sea_orm_active_enums::Location::from(location)),
            );
        }

        let rows = query
            .order_by_asc(employees::Column::FullName)
            .order_by_asc(employees::Column::Id)
            .find_also_related(pto_balances::Entity)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows
            .into_iter()
            .map(|(employee, balance)| EmployeeWithBalance {
                employee,
                days_remaining: balance.map_or(0, |b| b.days_remaining),
            })
            .collect())
    }

    /// Moves an employee to another home location.
    ///
    /// Requests already submitted keep the location they were filed under.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the employee does not exist.
    pub async fn update_location(
        &self,
        id: EmployeeId,
        location: Location,
    ) -> AppResult<employees::Model> {
        let employee = employees::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await
            .map_err(db_error)?
            .ok_or_else(|| AppError::NotFound(format!("employee {id}")))?;

        let mut active: employees::ActiveModel = employee.into();
        active.home_location = Set(location.into());
        active.updated_at = Set(Utc::now());

        let updated = active.update(&self.db).await.map_err(db_error)?;
        tracing::info!(employee_id = %id, location = %location, "Employee location changed");
        Ok(updated)
    }
}

#[allow(clippy::needless_pass_by_value)]
fn db_error(e: DbErr) -> AppError {
    AppError::Database(e.to_string())
}

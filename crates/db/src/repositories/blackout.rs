//! Blackout range repository.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};

use furlough_core::blackout::{BlackoutError, BlackoutRange, BlackoutRegistry};
use furlough_core::calendar::DateRange;
use furlough_shared::types::{BlackoutId, Location};

use crate::entities::{blackout_ranges, sea_orm_active_enums};

/// Blackout range repository.
#[derive(Debug, Clone)]
pub struct BlackoutRepository {
    db: DatabaseConnection,
}

impl BlackoutRepository {
    /// Creates a new blackout repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a blackout range. Overlapping ranges are kept as-is.
    ///
    /// # Errors
    ///
    /// Returns `Range` if `end < start`.
    pub async fn add(
        &self,
        location: Location,
        start: NaiveDate,
        end: NaiveDate,
        reason: Option<String>,
    ) -> Result<BlackoutRange, BlackoutError> {
        let blackout = BlackoutRange::new(location, start, end, reason)?;

        blackout_ranges::ActiveModel {
            id: Set(blackout.id.into_inner()),
            location: Set(location.into()),
            start_date: Set(blackout.range.start()),
            end_date: Set(blackout.range.end()),
            reason: Set(blackout.reason.clone()),
            created_at: Set(blackout.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(db_error)?;

        tracing::info!(
            blackout_id = %blackout.id,
            location = %location,
            start = %start,
            end = %end,
            "Blackout added"
        );
        Ok(blackout)
    }

    /// Removes a blackout range.
    ///
    /// Requests already approved inside the range stay approved.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no blackout has this ID.
    pub async fn remove(&self, id: BlackoutId) -> Result<(), BlackoutError> {
        let result = blackout_ranges::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(BlackoutError::NotFound(id));
        }

        tracing::info!(blackout_id = %id, "Blackout removed");
        Ok(())
    }

    /// All blackouts at `location`, ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn list(&self, location: Location) -> Result<Vec<BlackoutRange>, BlackoutError> {
        for_location(&self.db, location).await
    }

    /// Returns true if any blackout at `location` overlaps `range`.
    ///
    /// # Errors
    ///
    /// Returns `Database` if the query fails.
    pub async fn any_overlap(
        &self,
        location: Location,
        range: &DateRange,
    ) -> Result<bool, BlackoutError> {
        let candidates = overlapping(&self.db, location, range).await?;
        Ok(BlackoutRegistry::new(&candidates).any_overlap(location, range))
    }
}

/// Blackouts at `location` that share at least one day with `range`.
///
/// The date predicate narrows the rows; the registry makes the final call.
pub(crate) async fn overlapping<C: ConnectionTrait>(
    conn: &C,
    location: Location,
    range: &DateRange,
) -> Result<Vec<BlackoutRange>, BlackoutError> {
    let rows = blackout_ranges::Entity::find()
        .filter(blackout_ranges::Column::Location.eq(sea_orm_active_enums::Location::from(location)))
        .filter(blackout_ranges::Column::StartDate.lte(range.end()))
        .filter(blackout_ranges::Column::EndDate.gte(range.start()))
        .order_by_asc(blackout_ranges::Column::StartDate)
        .all(conn)
        .await
        .map_err(db_error)?;

    rows.into_iter().map(to_blackout).collect()
}

pub(crate) async fn for_location<C: ConnectionTrait>(
    conn: &C,
    location: Location,
) -> Result<Vec<BlackoutRange>, BlackoutError> {
    let rows = blackout_ranges::Entity::find()
        .filter(blackout_ranges::Column::Location.eq(sea_orm_active_enums::Location::from(location)))
        .order_by_asc(blackout_ranges::Column::StartDate)
        .order_by_asc(blackout_ranges::Column::EndDate)
        .order_by_asc(blackout_ranges::Column::Id)
        .all(conn)
        .await
        .map_err(db_error)?;

    rows.into_iter().map(to_blackout).collect()
}

fn to_blackout(model: blackout_ranges::Model) -> Result<BlackoutRange, BlackoutError> {
    Ok(BlackoutRange {
        id: BlackoutId::from_uuid(model.id),
        location: model.location.into(),
        range: DateRange::new(model.start_date, model.end_date)?,
        reason: model.reason,
        created_at: model.created_at,
    })
}

#[allow(clippy::needless_pass_by_value)]
fn db_error(e: DbErr) -> BlackoutError {
    BlackoutError::Database(e.to_string())
}

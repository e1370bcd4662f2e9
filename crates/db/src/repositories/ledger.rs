//! Balance ledger repository.
//!
//! Every balance mutation is a single predicated `UPDATE` on the employee's
//! `pto_balances` row plus a `ledger_movements` insert, so the check and
//! the write can never interleave with another writer. Methods suffixed
//! `_in` run on a caller-supplied connection and join its transaction.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};

use furlough_core::ledger::{BalanceSnapshot, LedgerError, LedgerMovement, LedgerPolicy};
use furlough_shared::types::{EmployeeId, MovementId, RequestId};

use crate::entities::{
    employees, ledger_movements, pto_balances, sea_orm_active_enums::MovementKind,
};

/// A movement about to be recorded.
struct NewMovement {
    employee_id: EmployeeId,
    kind: MovementKind,
    delta: i32,
    request_id: Option<RequestId>,
    actor_id: Option<EmployeeId>,
    memo: Option<String>,
    balance_after: i32,
}

/// Balance ledger repository.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
    policy: LedgerPolicy,
}

impl LedgerRepository {
    /// Creates a new ledger repository enforcing `policy` on debits.
    #[must_use]
    pub const fn new(db: DatabaseConnection, policy: LedgerPolicy) -> Self {
        Self { db, policy }
    }

    /// Current balance of an employee.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no balance row exists.
    pub async fn balance_of(&self, employee_id: EmployeeId) -> Result<BalanceSnapshot, LedgerError> {
        load_balance(&self.db, employee_id).await
    }

    /// All movements of an employee, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no balance row exists.
    pub async fn movements(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Vec<LedgerMovement>, LedgerError> {
        load_balance(&self.db, employee_id).await?;

        let rows = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::EmployeeId.eq(employee_id.into_inner()))
            .order_by_asc(ledger_movements::Column::CreatedAt)
            .order_by_asc(ledger_movements::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_error)?;

        Ok(rows.into_iter().map(to_movement).collect())
    }

    /// Debits `amount` days for `cause` in a transaction of its own.
    ///
    /// # Errors
    ///
    /// See [`LedgerRepository::debit_in`].
    pub async fn debit(
        &self,
        employee_id: EmployeeId,
        amount: i32,
        cause: RequestId,
        actor_id: EmployeeId,
    ) -> Result<LedgerMovement, LedgerError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        let movement = self.debit_in(&txn, employee_id, amount, cause, actor_id).await?;
        txn.commit().await.map_err(db_error)?;
        Ok(movement)
    }

    /// Debits `amount` days for `cause` on `conn`.
    ///
    /// At most one debit is ever recorded per cause. The floor check and the
    /// decrement are one conditional statement.
    ///
    /// # Errors
    ///
    /// * `NonPositiveAmount` if `amount <= 0`
    /// * `AlreadyDebited` if `cause` already has a debit
    /// * `EmployeeNotFound` if no balance row exists or `actor_id` is unknown
    /// * `InsufficientBalance` if the debit would cross the floor
    pub async fn debit_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        employee_id: EmployeeId,
        amount: i32,
        cause: RequestId,
        actor_id: EmployeeId,
    ) -> Result<LedgerMovement, LedgerError> {
        let threshold = self.policy.debit_threshold(amount)?;
        ensure_actor(conn, actor_id).await?;

        let existing = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::RequestId.eq(cause.into_inner()))
            .filter(ledger_movements::Column::Kind.eq(MovementKind::Debit))
            .one(conn)
            .await
            .map_err(db_error)?;
        if existing.is_some() {
            return Err(LedgerError::AlreadyDebited(cause));
        }

        let mut update = pto_balances::Entity::update_many()
            .col_expr(
                pto_balances::Column::DaysRemaining,
                Expr::col(pto_balances::Column::DaysRemaining).sub(amount),
            )
            .col_expr(
                pto_balances::Column::Version,
                Expr::col(pto_balances::Column::Version).add(1),
            )
            .col_expr(pto_balances::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(pto_balances::Column::EmployeeId.eq(employee_id.into_inner()));
        if let Some(threshold) = threshold {
            update = update.filter(pto_balances::Column::DaysRemaining.gte(threshold));
        }

        let result = update.exec(conn).await.map_err(db_error)?;
        if result.rows_affected == 0 {
            let current = load_balance(conn, employee_id).await?;
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                remaining: current.days_remaining,
            });
        }

        let after = load_balance(conn, employee_id).await?;
        let movement = record(
            conn,
            NewMovement {
                employee_id,
                kind: MovementKind::Debit,
                delta: -amount,
                request_id: Some(cause),
                actor_id: Some(actor_id),
                memo: None,
                balance_after: after.days_remaining,
            },
        )
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => LedgerError::AlreadyDebited(cause),
            _ => db_error(e),
        })?;

        tracing::debug!(
            employee_id = %employee_id,
            request_id = %cause,
            amount,
            balance_after = after.days_remaining,
            "Balance debited"
        );
        Ok(movement)
    }

    /// Credits back the debit recorded for `cause` in a transaction of its own.
    ///
    /// # Errors
    ///
    /// See [`LedgerRepository::credit_in`].
    pub async fn credit(
        &self,
        employee_id: EmployeeId,
        amount: i32,
        cause: RequestId,
        actor_id: EmployeeId,
        memo: Option<String>,
    ) -> Result<LedgerMovement, LedgerError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        let movement = self
            .credit_in(&txn, employee_id, amount, cause, actor_id, memo)
            .await?;
        txn.commit().await.map_err(db_error)?;
        Ok(movement)
    }

    /// Credits `amount` days reversing the debit recorded for `cause` on `conn`.
    ///
    /// # Errors
    ///
    /// * `NoPriorDebit` if `cause` has no debit for this employee
    /// * `AlreadyCredited` if `cause` was already credited
    /// * `CreditMismatch` if `amount` differs from the debit
    /// * `EmployeeNotFound` if `actor_id` is unknown
    pub async fn credit_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        employee_id: EmployeeId,
        amount: i32,
        cause: RequestId,
        actor_id: EmployeeId,
        memo: Option<String>,
    ) -> Result<LedgerMovement, LedgerError> {
        ensure_actor(conn, actor_id).await?;
        let prior = ledger_movements::Entity::find()
            .filter(ledger_movements::Column::RequestId.eq(cause.into_inner()))
            .filter(ledger_movements::Column::Kind.is_in([MovementKind::Debit, MovementKind::Credit]))
            .all(conn)
            .await
            .map_err(db_error)?;

        let prior_debit = prior
            .iter()
            .find(|m| {
                m.kind == MovementKind::Debit && m.employee_id == employee_id.into_inner()
            })
            .map(|m| -m.amount);
        let already_credited = prior.iter().any(|m| m.kind == MovementKind::Credit);
        LedgerPolicy::check_credit(cause, amount, prior_debit, already_credited)?;

        let after = apply_delta(conn, employee_id, amount).await?;
        let movement = record(
            conn,
            NewMovement {
                employee_id,
                kind: MovementKind::Credit,
                delta: amount,
                request_id: Some(cause),
                actor_id: Some(actor_id),
                memo: clean_memo(memo),
                balance_after: after,
            },
        )
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => LedgerError::AlreadyCredited(cause),
            _ => db_error(e),
        })?;

        tracing::info!(
            employee_id = %employee_id,
            request_id = %cause,
            amount,
            balance_after = after,
            "Balance credited"
        );
        Ok(movement)
    }

    /// Applies a signed administrative adjustment.
    ///
    /// Adjustments bypass the floor; they are how an administrator corrects
    /// a balance by hand.
    ///
    /// # Errors
    ///
    /// Returns `EmployeeNotFound` if no balance row exists or `actor_id` is
    /// unknown.
    pub async fn adjust(
        &self,
        employee_id: EmployeeId,
        delta: i32,
        actor_id: EmployeeId,
        memo: Option<String>,
    ) -> Result<LedgerMovement, LedgerError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        ensure_actor(&txn, actor_id).await?;
        let after = apply_delta(&txn, employee_id, delta).await?;
        let movement = record(
            &txn,
            NewMovement {
                employee_id,
                kind: MovementKind::Adjustment,
                delta,
                request_id: None,
                actor_id: Some(actor_id),
                memo: clean_memo(memo),
                balance_after: after,
            },
        )
        .await
        .map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(employee_id = %employee_id, delta, balance_after = after, "Balance adjusted");
        Ok(movement)
    }

    /// Sets the balance to `target`, recording the difference as an adjustment.
    ///
    /// # Errors
    ///
    /// * `EmployeeNotFound` if no balance row exists or `actor_id` is unknown
    /// * `ConcurrentUpdate` if the balance changed while this ran
    pub async fn set_balance(
        &self,
        employee_id: EmployeeId,
        target: i32,
        actor_id: EmployeeId,
        memo: Option<String>,
    ) -> Result<LedgerMovement, LedgerError> {
        let txn = self.db.begin().await.map_err(db_error)?;
        ensure_actor(&txn, actor_id).await?;

        let current = load_balance(&txn, employee_id).await?;
        let delta = target
            .checked_sub(current.days_remaining)
            .ok_or(LedgerError::Overflow)?;

        let result = pto_balances::Entity::update_many()
            .col_expr(pto_balances::Column::DaysRemaining, Expr::value(target))
            .col_expr(
                pto_balances::Column::Version,
                Expr::col(pto_balances::Column::Version).add(1),
            )
            .col_expr(pto_balances::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(pto_balances::Column::EmployeeId.eq(employee_id.into_inner()))
            .filter(pto_balances::Column::Version.eq(current.version))
            .exec(&txn)
            .await
            .map_err(db_error)?;
        if result.rows_affected == 0 {
            return Err(LedgerError::ConcurrentUpdate(employee_id));
        }

        let movement = record(
            &txn,
            NewMovement {
                employee_id,
                kind: MovementKind::Adjustment,
                delta,
                request_id: None,
                actor_id: Some(actor_id),
                memo: clean_memo(memo),
                balance_after: target,
            },
        )
        .await
        .map_err(db_error)?;
        txn.commit().await.map_err(db_error)?;

        tracing::info!(
            employee_id = %employee_id,
            previous = current.days_remaining,
            balance = target,
            "Balance set"
        );
        Ok(movement)
    }
}

/// Reads the balance row of an employee on `conn`.
pub(crate) async fn load_balance<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
) -> Result<BalanceSnapshot, LedgerError> {
    let row = pto_balances::Entity::find_by_id(employee_id.into_inner())
        .one(conn)
        .await
        .map_err(db_error)?
        .ok_or(LedgerError::EmployeeNotFound(employee_id))?;

    Ok(BalanceSnapshot {
        employee_id,
        days_remaining: row.days_remaining,
        version: row.version,
    })
}

/// Fails with `EmployeeNotFound` unless the acting person is an employee.
async fn ensure_actor<C: ConnectionTrait>(conn: &C, actor_id: EmployeeId) -> Result<(), LedgerError> {
    employees::Entity::find_by_id(actor_id.into_inner())
        .one(conn)
        .await
        .map_err(db_error)?
        .map(|_| ())
        .ok_or(LedgerError::EmployeeNotFound(actor_id))
}

/// Adds `delta` unconditionally and returns the new balance.
async fn apply_delta<C: ConnectionTrait>(
    conn: &C,
    employee_id: EmployeeId,
    delta: i32,
) -> Result<i32, LedgerError> {
    let result = pto_balances::Entity::update_many()
        .col_expr(
            pto_balances::Column::DaysRemaining,
            Expr::col(pto_balances::Column::DaysRemaining).add(delta),
        )
        .col_expr(
            pto_balances::Column::Version,
            Expr::col(pto_balances::Column::Version).add(1),
        )
        .col_expr(pto_balances::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(pto_balances::Column::EmployeeId.eq(employee_id.into_inner()))
        .exec(conn)
        .await
        .map_err(db_error)?;
    if result.rows_affected == 0 {
        return Err(LedgerError::EmployeeNotFound(employee_id));
    }
    Ok(load_balance(conn, employee_id).await?.days_remaining)
}

async fn record<C: ConnectionTrait>(conn: &C, new: NewMovement) -> Result<LedgerMovement, DbErr> {
    let model = ledger_movements::ActiveModel {
        id: Set(MovementId::new().into_inner()),
        employee_id: Set(new.employee_id.into_inner()),
        kind: Set(new.kind),
        amount: Set(new.delta),
        request_id: Set(new.request_id.map(RequestId::into_inner)),
        actor_id: Set(new.actor_id.map(EmployeeId::into_inner)),
        memo: Set(new.memo),
        balance_after: Set(new.balance_after),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await?;

    Ok(to_movement(model))
}

fn clean_memo(memo: Option<String>) -> Option<String> {
    memo.map(|m| m.trim().to_string()).filter(|m| !m.is_empty())
}

pub(crate) fn to_movement(model: ledger_movements::Model) -> LedgerMovement {
    LedgerMovement {
        id: MovementId::from_uuid(model.id),
        employee_id: EmployeeId::from_uuid(model.employee_id),
        kind: model.kind.into(),
        delta: model.amount,
        request_id: model.request_id.map(RequestId::from_uuid),
        actor_id: model.actor_id.map(EmployeeId::from_uuid),
        memo: model.memo,
        balance_after: model.balance_after,
        created_at: model.created_at,
    }
}

#[allow(clippy::needless_pass_by_value)]
fn db_error(e: DbErr) -> LedgerError {
    LedgerError::Database(e.to_string())
}

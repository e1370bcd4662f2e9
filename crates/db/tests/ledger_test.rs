//! Integration tests for the balance ledger.

mod common;

use common::{employee_with_balance, setup_db};
use furlough_core::ledger::{LedgerError, LedgerPolicy, MovementKind};
use furlough_db::repositories::LedgerRepository;
use furlough_shared::types::{EmployeeId, Location, RequestId};

#[tokio::test]
async fn test_debit_decrements_and_records_movement() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 10).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let cause = RequestId::new();

    let movement = ledger.debit(employee, 3, cause, employee).await.unwrap();
    assert_eq!(movement.kind, MovementKind::Debit);
    assert_eq!(movement.delta, -3);
    assert_eq!(movement.balance_after, 7);
    assert_eq!(movement.request_id, Some(cause));

    let balance = ledger.balance_of(employee).await.unwrap();
    assert_eq!(balance.days_remaining, 7);
}

#[tokio::test]
async fn test_debit_is_exactly_once_per_cause() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 10).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let cause = RequestId::new();

    ledger.debit(employee, 2, cause, employee).await.unwrap();
    let again = ledger.debit(employee, 2, cause, employee).await;

    assert_eq!(again, Err(LedgerError::AlreadyDebited(cause)));
    assert_eq!(ledger.balance_of(employee).await.unwrap().days_remaining, 8);
}

#[tokio::test]
async fn test_debit_below_floor_is_rejected() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 2).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let before = ledger.balance_of(employee).await.unwrap();

    let result = ledger.debit(employee, 3, RequestId::new(), employee).await;

    assert_eq!(
        result,
        Err(LedgerError::InsufficientBalance {
            requested: 3,
            remaining: 2
        })
    );
    let after = ledger.balance_of(employee).await.unwrap();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_overdraft_policy_allows_negative() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 1).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::overdraft());

    let movement = ledger.debit(employee, 4, RequestId::new(), employee).await.unwrap();
    assert_eq!(movement.balance_after, -3);
}

#[tokio::test]
async fn test_debit_unknown_employee() {
    let db = setup_db().await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let ghost = EmployeeId::new();

    let result = ledger.debit(ghost, 1, RequestId::new(), ghost).await;
    assert_eq!(result, Err(LedgerError::EmployeeNotFound(ghost)));
}

#[tokio::test]
async fn test_credit_reverses_prior_debit_once() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 10).await;
    let admin = employee_with_balance(&db, "Admin", Location::CompanyA, 0).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let cause = RequestId::new();

    ledger.debit(employee, 4, cause, admin).await.unwrap();

    let mismatch = ledger.credit(employee, 3, cause, admin, None).await;
    assert_eq!(
        mismatch,
        Err(LedgerError::CreditMismatch {
            debited: 4,
            requested: 3
        })
    );

    let credit = ledger
        .credit(employee, 4, cause, admin, Some("trip cancelled".to_string()))
        .await
        .unwrap();
    assert_eq!(credit.kind, MovementKind::Credit);
    assert_eq!(credit.balance_after, 10);
    assert_eq!(credit.memo.as_deref(), Some("trip cancelled"));

    let again = ledger.credit(employee, 4, cause, admin, None).await;
    assert_eq!(again, Err(LedgerError::AlreadyCredited(cause)));
    assert_eq!(ledger.balance_of(employee).await.unwrap().days_remaining, 10);
}

#[tokio::test]
async fn test_credit_without_debit_is_rejected() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 5).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let cause = RequestId::new();

    let result = ledger.credit(employee, 1, cause, employee, None).await;
    assert_eq!(result, Err(LedgerError::NoPriorDebit(cause)));
}

#[tokio::test]
async fn test_set_balance_records_adjustment() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyB, 10).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());

    let movement = ledger.set_balance(employee, 15, employee, None).await.unwrap();
    assert_eq!(movement.kind, MovementKind::Adjustment);
    assert_eq!(movement.delta, 5);
    assert_eq!(movement.balance_after, 15);

    let adjust = ledger
        .adjust(employee, -2, employee, Some("correction".to_string()))
        .await
        .unwrap();
    assert_eq!(adjust.balance_after, 13);

    let history = ledger.movements(employee).await.unwrap();
    let deltas: Vec<i32> = history.iter().map(|m| m.delta).collect();
    assert_eq!(deltas, vec![10, 5, -2]);
}

#[tokio::test]
async fn test_every_mutation_bumps_version() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 0).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());

    let v0 = ledger.balance_of(employee).await.unwrap().version;
    ledger.set_balance(employee, 5, employee, None).await.unwrap();
    ledger.debit(employee, 1, RequestId::new(), employee).await.unwrap();

    assert_eq!(ledger.balance_of(employee).await.unwrap().version, v0 + 2);
}

#[tokio::test]
async fn test_unknown_actor_is_rejected() {
    let db = setup_db().await;
    let employee = employee_with_balance(&db, "Ada", Location::CompanyA, 10).await;
    let admin = employee_with_balance(&db, "Admin", Location::CompanyA, 0).await;
    let ledger = LedgerRepository::new(db, LedgerPolicy::default());
    let ghost = EmployeeId::new();
    let cause = RequestId::new();

    assert_eq!(
        ledger.debit(employee, 2, cause, ghost).await,
        Err(LedgerError::EmployeeNotFound(ghost))
    );
    assert_eq!(
        ledger.adjust(employee, 1, ghost, None).await,
        Err(LedgerError::EmployeeNotFound(ghost))
    );
    assert_eq!(
        ledger.set_balance(employee, 3, ghost, None).await,
        Err(LedgerError::EmployeeNotFound(ghost))
    );

    ledger.debit(employee, 2, cause, admin).await.unwrap();
    assert_eq!(
        ledger.credit(employee, 2, cause, ghost, None).await,
        Err(LedgerError::EmployeeNotFound(ghost))
    );

    assert_eq!(ledger.balance_of(employee).await.unwrap().days_remaining, 8);
    let movements = ledger.movements(employee).await.unwrap();
    assert!(movements.iter().all(|m| m.actor_id != Some(ghost)));
}

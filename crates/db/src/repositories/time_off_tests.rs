//! Tests for approvals decided from a snapshot read before another writer
//! moved the request out of `pending`.

use chrono::NaiveDate;
use sea_orm::{ConnectOptions, Database, DatabaseConnection, TransactionTrait};
use sea_orm_migration::MigratorTrait;

use furlough_core::ledger::{LedgerPolicy, MovementKind};
use furlough_core::lifecycle::{LifecycleError, LifecycleService, RequestStatus};
use furlough_shared::types::{EmployeeId, Location};

use super::{TimeOffRepository, claim, load_request};
use crate::migration::Migrator;
use crate::repositories::{CreateEmployeeInput, EmployeeRepository, LedgerRepository};

async fn setup() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

async fn employee(db: &DatabaseConnection, name: &str, balance: i32) -> EmployeeId {
    let model = EmployeeRepository::new(db.clone())
        .create(CreateEmployeeInput {
            full_name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            home_location: Location::CompanyA,
        })
        .await
        .unwrap();
    let id = EmployeeId::from_uuid(model.id);
    if balance != 0 {
        LedgerRepository::new(db.clone(), LedgerPolicy::default())
            .set_balance(id, balance, id, None)
            .await
            .unwrap();
    }
    id
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[tokio::test]
async fn test_second_approval_from_pending_snapshot_loses() {
    let db = setup().await;
    let ada = employee(&db, "Ada", 10).await;
    let admin = employee(&db, "Admin", 0).await;
    let repo = TimeOffRepository::new(db.clone(), LedgerPolicy::default());
    let request = repo
        .submit(ada, date(2024, 6, 1), date(2024, 6, 3), None)
        .await
        .unwrap();

    // Both deciders read the row while it is still pending.
    let first = load_request(&db, request.id).await.unwrap();
    let second = load_request(&db, request.id).await.unwrap();
    assert_eq!(first.status, RequestStatus::Pending);
    assert_eq!(second.status, RequestStatus::Pending);

    let txn = db.begin().await.unwrap();
    let approved = repo.approve_loaded(&txn, first, admin).await.unwrap();
    txn.commit().await.unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);

    let txn = db.begin().await.unwrap();
    let err = repo.approve_loaded(&txn, second, admin).await.unwrap_err();
    txn.rollback().await.unwrap();
    assert!(
        matches!(
            err,
            LifecycleError::InvalidTransition {
                from: RequestStatus::Approved,
                to: RequestStatus::Approved,
            }
        ),
        "{err:?}"
    );

    let ledger = LedgerRepository::new(db.clone(), LedgerPolicy::default());
    assert_eq!(ledger.balance_of(ada).await.unwrap().days_remaining, 7);
    let debits = ledger
        .movements(ada)
        .await
        .unwrap()
        .into_iter()
        .filter(|m| m.kind == MovementKind::Debit)
        .count();
    assert_eq!(debits, 1);
}

#[tokio::test]
async fn test_denial_from_pending_snapshot_does_not_overwrite_approval() {
    let db = setup().await;
    let ada = employee(&db, "Ada", 10).await;
    let admin = employee(&db, "Admin", 0).await;
    let repo = TimeOffRepository::new(db.clone(), LedgerPolicy::default());
    let request = repo
        .submit(ada, date(2024, 6, 1), date(2024, 6, 1), None)
        .await
        .unwrap();

    let snapshot = load_request(&db, request.id).await.unwrap();
    let deny = LifecycleService::deny(snapshot.status, admin).unwrap();

    repo.approve(request.id, admin).await.unwrap();

    let err = claim(&db, request.id, &deny, None).await.unwrap_err();
    assert!(
        matches!(
            err,
            LifecycleError::InvalidTransition {
                from: RequestStatus::Approved,
                to: RequestStatus::Denied,
            }
        ),
        "{err:?}"
    );
    let stored = load_request(&db, request.id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
}

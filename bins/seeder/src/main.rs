//! Database seeder for Furlough development and testing.
//!
//! Seeds a handful of employees per location with opening balances, a
//! year-end blackout at every location, and one approved request so the
//! calendar feed has something to show.
//!
//! Usage: cargo run --bin seeder

use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::DatabaseConnection;

use furlough_core::ledger::LedgerPolicy;
use furlough_db::repositories::{
    BlackoutRepository, CreateEmployeeInput, EmployeeRepository, LedgerRepository,
    TimeOffRepository,
};
use furlough_shared::AppError;
use furlough_shared::types::{EmployeeId, Location};

/// (name, email, location, opening balance)
const EMPLOYEES: [(&str, &str, Location, i32); 5] = [
    ("Ada Admin", "admin@furlough.dev", Location::CompanyA, 20),
    ("Alice Smith", "alice@furlough.dev", Location::CompanyA, 15),
    ("Bob Jones", "bob@furlough.dev", Location::CompanyB, 12),
    ("Carol White", "carol@furlough.dev", Location::CompanyC, 10),
    ("Dan Brown", "dan@furlough.dev", Location::CompanyC, 5),
];

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = furlough_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding employees...");
    let ids = seed_employees(&db).await;

    println!("Seeding blackouts...");
    seed_blackouts(&db).await;

    println!("Seeding requests...");
    seed_requests(&db, &ids).await;

    println!("Seeding complete!");
}

/// Creates the demo employees, skipping any whose email already exists.
async fn seed_employees(db: &DatabaseConnection) -> Vec<EmployeeId> {
    let employees = EmployeeRepository::new(db.clone());
    let ledger = LedgerRepository::new(db.clone(), LedgerPolicy::default());
    let mut ids = Vec::new();

    for (name, email, location, balance) in EMPLOYEES {
        let created = employees
            .create(CreateEmployeeInput {
                full_name: name.to_string(),
                email: email.to_string(),
                home_location: location,
            })
            .await;

        match created {
            Ok(employee) => {
                let id = EmployeeId::from_uuid(employee.id);
                if let Err(e) = ledger
                    .set_balance(id, balance, id, Some("opening balance".to_string()))
                    .await
                {
                    eprintln!("Failed to set balance for {email}: {e}");
                }
                println!("  Created {name} at {location} with {balance} days");
                ids.push(id);
            }
            Err(AppError::Conflict(_)) => {
                println!("  {email} already exists, skipping...");
            }
            Err(e) => eprintln!("Failed to create {email}: {e}"),
        }
    }
    ids
}

/// Blocks the last ten days of the current year everywhere.
async fn seed_blackouts(db: &DatabaseConnection) {
    let blackouts = BlackoutRepository::new(db.clone());
    let year = Utc::now().year();
    let start = NaiveDate::from_ymd_opt(year, 12, 22).expect("valid date");
    let end = NaiveDate::from_ymd_opt(year, 12, 31).expect("valid date");

    for location in Location::ALL {
        let existing = blackouts.list(location).await.unwrap_or_default();
        if existing.iter().any(|b| b.range.start() == start) {
            println!("  Blackout at {location} already exists, skipping...");
            continue;
        }
        match blackouts
            .add(location, start, end, Some("Year-end close".to_string()))
            .await
        {
            Ok(_) => println!("  Blocked {start}..{end} at {location}"),
            Err(e) => eprintln!("Failed to add blackout at {location}: {e}"),
        }
    }
}

/// Submits and approves one request for the first non-admin employee.
async fn seed_requests(db: &DatabaseConnection, ids: &[EmployeeId]) {
    let [admin, requester, ..] = ids else {
        println!("  Employees already seeded, skipping requests...");
        return;
    };

    let requests = TimeOffRepository::new(db.clone(), LedgerPolicy::default());
    let today = Utc::now().date_naive();
    let start = today + chrono::Duration::days(14);
    let end = start + chrono::Duration::days(2);

    let request = match requests
        .submit(*requester, start, end, Some("Seeded request".to_string()))
        .await
    {
        Ok(request) => request,
        Err(e) => {
            eprintln!("Failed to submit request: {e}");
            return;
        }
    };

    match requests.approve(request.id, *admin).await {
        Ok(_) => println!("  Approved {start}..{end} ({} days)", request.days_requested),
        Err(e) => eprintln!("Failed to approve request: {e}"),
    }
}

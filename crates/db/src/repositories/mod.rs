//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod blackout;
pub mod employee;
pub mod export;
pub mod ledger;
pub mod time_off;

pub use blackout::BlackoutRepository;
pub use employee::{CreateEmployeeInput, EmployeeRepository, EmployeeWithBalance};
pub use export::ExportRepository;
pub use ledger::LedgerRepository;
pub use time_off::{RequestWithEmployee, TimeOffRepository};

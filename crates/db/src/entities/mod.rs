//! `SeaORM` entity definitions.

pub mod blackout_ranges;
pub mod employees;
pub mod ledger_movements;
pub mod pto_balances;
pub mod sea_orm_active_enums;
pub mod time_off_requests;

pub mod prelude {
    //! Entity re-exports.
    pub use super::blackout_ranges::Entity as BlackoutRanges;
    pub use super::employees::Entity as Employees;
    pub use super::ledger_movements::Entity as LedgerMovements;
    pub use super::pto_balances::Entity as PtoBalances;
    pub use super::time_off_requests::Entity as TimeOffRequests;
}

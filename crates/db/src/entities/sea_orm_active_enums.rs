//! Enums stored as strings, with conversions to the domain enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use furlough_core::{ledger, lifecycle};
use furlough_shared::types;

/// Company location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Location {
    /// `CompanyA`.
    #[sea_orm(string_value = "CompanyA")]
    CompanyA,
    /// `CompanyB`.
    #[sea_orm(string_value = "CompanyB")]
    CompanyB,
    /// `CompanyC`.
    #[sea_orm(string_value = "CompanyC")]
    CompanyC,
}

impl From<types::Location> for Location {
    fn from(value: types::Location) -> Self {
        match value {
            types::Location::CompanyA => Self::CompanyA,
            types::Location::CompanyB => Self::CompanyB,
            types::Location::CompanyC => Self::CompanyC,
        }
    }
}

impl From<Location> for types::Location {
    fn from(value: Location) -> Self {
        match value {
            Location::CompanyA => Self::CompanyA,
            Location::CompanyB => Self::CompanyB,
            Location::CompanyC => Self::CompanyC,
        }
    }
}

/// Time-off request status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum RequestStatus {
    /// Awaiting a decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved and debited.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Denied.
    #[sea_orm(string_value = "denied")]
    Denied,
    /// Withdrawn by the requester.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<lifecycle::RequestStatus> for RequestStatus {
    fn from(value: lifecycle::RequestStatus) -> Self {
        match value {
            lifecycle::RequestStatus::Pending => Self::Pending,
            lifecycle::RequestStatus::Approved => Self::Approved,
            lifecycle::RequestStatus::Denied => Self::Denied,
            lifecycle::RequestStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<RequestStatus> for lifecycle::RequestStatus {
    fn from(value: RequestStatus) -> Self {
        match value {
            RequestStatus::Pending => Self::Pending,
            RequestStatus::Approved => Self::Approved,
            RequestStatus::Denied => Self::Denied,
            RequestStatus::Cancelled => Self::Cancelled,
        }
    }
}

/// Kind of balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum MovementKind {
    /// Approval debit.
    #[sea_orm(string_value = "debit")]
    Debit,
    /// Reversal of a debit.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Administrative correction.
    #[sea_orm(string_value = "adjustment")]
    Adjustment,
}

impl From<ledger::MovementKind> for MovementKind {
    fn from(value: ledger::MovementKind) -> Self {
        match value {
            ledger::MovementKind::Debit => Self::Debit,
            ledger::MovementKind::Credit => Self::Credit,
            ledger::MovementKind::Adjustment => Self::Adjustment,
        }
    }
}

impl From<MovementKind> for ledger::MovementKind {
    fn from(value: MovementKind) -> Self {
        match value {
            MovementKind::Debit => Self::Debit,
            MovementKind::Credit => Self::Credit,
            MovementKind::Adjustment => Self::Adjustment,
        }
    }
}

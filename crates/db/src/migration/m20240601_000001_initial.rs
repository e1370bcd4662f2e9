//! Initial schema: employees, balances, ledger movements, blackouts and requests.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    #[allow(clippy::too_many_lines)]
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Employees::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Employees::FullName).string().not_null())
                    .col(ColumnDef::new(Employees::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Employees::HomeLocation).string().not_null())
                    .col(
                        ColumnDef::new(Employees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PtoBalances::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PtoBalances::EmployeeId)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PtoBalances::DaysRemaining).integer().not_null())
                    .col(
                        ColumnDef::new(PtoBalances::Version)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(PtoBalances::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pto_balances_employee")
                            .from(PtoBalances::Table, PtoBalances::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerMovements::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerMovements::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(LedgerMovements::Kind).string().not_null())
                    .col(ColumnDef::new(LedgerMovements::Amount).integer().not_null())
                    .col(ColumnDef::new(LedgerMovements::RequestId).uuid().null())
                    .col(ColumnDef::new(LedgerMovements::ActorId).uuid().null())
                    .col(ColumnDef::new(LedgerMovements::Memo).text().null())
                    .col(
                        ColumnDef::new(LedgerMovements::BalanceAfter)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerMovements::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_movements_employee")
                            .from(LedgerMovements::Table, LedgerMovements::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_ledger_movements_actor")
                            .from(LedgerMovements::Table, LedgerMovements::ActorId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // One debit and one credit per request at most.
        manager
            .create_index(
                Index::create()
                    .name("uq_ledger_movements_request_kind")
                    .table(LedgerMovements::Table)
                    .col(LedgerMovements::RequestId)
                    .col(LedgerMovements::Kind)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_movements_employee")
                    .table(LedgerMovements::Table)
                    .col(LedgerMovements::EmployeeId)
                    .col(LedgerMovements::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BlackoutRanges::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BlackoutRanges::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BlackoutRanges::Location).string().not_null())
                    .col(ColumnDef::new(BlackoutRanges::StartDate).date().not_null())
                    .col(ColumnDef::new(BlackoutRanges::EndDate).date().not_null())
                    .col(ColumnDef::new(BlackoutRanges::Reason).text().null())
                    .col(
                        ColumnDef::new(BlackoutRanges::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(Expr::col(BlackoutRanges::StartDate).lte(Expr::col(BlackoutRanges::EndDate)))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blackout_ranges_location")
                    .table(BlackoutRanges::Table)
                    .col(BlackoutRanges::Location)
                    .col(BlackoutRanges::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TimeOffRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TimeOffRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TimeOffRequests::EmployeeId).uuid().not_null())
                    .col(ColumnDef::new(TimeOffRequests::Location).string().not_null())
                    .col(ColumnDef::new(TimeOffRequests::StartDate).date().not_null())
                    .col(ColumnDef::new(TimeOffRequests::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(TimeOffRequests::DaysRequested)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TimeOffRequests::Note).text().null())
                    .col(ColumnDef::new(TimeOffRequests::Status).string().not_null())
                    .col(ColumnDef::new(TimeOffRequests::DecidedBy).uuid().null())
                    .col(
                        ColumnDef::new(TimeOffRequests::DecidedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(TimeOffRequests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TimeOffRequests::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .check(
                        Expr::col(TimeOffRequests::StartDate)
                            .lte(Expr::col(TimeOffRequests::EndDate)),
                    )
                    .check(Expr::col(TimeOffRequests::DaysRequested).gt(0))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_off_requests_employee")
                            .from(TimeOffRequests::Table, TimeOffRequests::EmployeeId)
                            .to(Employees::Table, Employees::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_time_off_requests_decided_by")
                            .from(TimeOffRequests::Table, TimeOffRequests::DecidedBy)
                            .to(Employees::Table, Employees::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_off_requests_employee")
                    .table(TimeOffRequests::Table)
                    .col(TimeOffRequests::EmployeeId)
                    .col(TimeOffRequests::StartDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_time_off_requests_location_status")
                    .table(TimeOffRequests::Table)
                    .col(TimeOffRequests::Location)
                    .col(TimeOffRequests::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TimeOffRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BlackoutRanges::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PtoBalances::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    FullName,
    Email,
    HomeLocation,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PtoBalances {
    Table,
    EmployeeId,
    DaysRemaining,
    Version,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum LedgerMovements {
    Table,
    Id,
    EmployeeId,
    Kind,
    Amount,
    RequestId,
    ActorId,
    Memo,
    BalanceAfter,
    CreatedAt,
}

#[derive(DeriveIden)]
enum BlackoutRanges {
    Table,
    Id,
    Location,
    StartDate,
    EndDate,
    Reason,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TimeOffRequests {
    Table,
    Id,
    EmployeeId,
    Location,
    StartDate,
    EndDate,
    DaysRequested,
    Note,
    Status,
    DecidedBy,
    DecidedAt,
    CreatedAt,
    UpdatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use super::m20251001_000003_create_employee_table::Employee;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VacationType::Table)
                    .if_not_exists()
                    .col(pk_auto(VacationType::Id))
                    .col(string_uniq(VacationType::Code))
                    .col(string(VacationType::Name))
                    .col(text_null(VacationType::Description))
                    .col(boolean(VacationType::Enabled).default(true))
                    .col(integer(VacationType::SortOrder).default(0))
                    .col(
                        timestamp_with_time_zone(VacationType::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Holiday::Table)
                    .if_not_exists()
                    .col(pk_auto(Holiday::Id))
                    .col(string_len(Holiday::Name, 20))
                    .col(integer(Holiday::Days))
                    .col(integer(Holiday::Month))
                    .col(integer(Holiday::Year))
                    .col(integer(Holiday::VacationTypeId))
                    .col(
                        timestamp_with_time_zone(Holiday::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_holiday_vacation_type_id")
                            .from(Holiday::Table, Holiday::VacationTypeId)
                            .to(VacationType::Table, VacationType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ConversionRule::Table)
                    .if_not_exists()
                    .col(pk_auto(ConversionRule::Id))
                    .col(string(ConversionRule::Name))
                    .col(string(ConversionRule::SourceType).default("overtime"))
                    .col(string(ConversionRule::TargetType))
                    .col(double(ConversionRule::Ratio))
                    .col(boolean(ConversionRule::Enabled).default(false))
                    .col(text_null(ConversionRule::Description))
                    .col(
                        timestamp_with_time_zone(ConversionRule::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(ConversionRule::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VacationBalance::Table)
                    .if_not_exists()
                    .col(pk_auto(VacationBalance::Id))
                    .col(integer(VacationBalance::EmployeeId))
                    .col(integer(VacationBalance::Year))
                    .col(integer(VacationBalance::VacationTypeId))
                    .col(double(VacationBalance::TotalDays).default(0.0))
                    .col(double(VacationBalance::ConvertedDays).default(0.0))
                    .col(double(VacationBalance::AdjustedDays).default(0.0))
                    .col(double(VacationBalance::UsedDays).default(0.0))
                    .col(
                        timestamp_with_time_zone(VacationBalance::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(VacationBalance::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vacation_balance_employee_id")
                            .from(VacationBalance::Table, VacationBalance::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vacation_balance_vacation_type_id")
                            .from(VacationBalance::Table, VacationBalance::VacationTypeId)
                            .to(VacationType::Table, VacationType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vacation_balance_employee_year_type")
                    .table(VacationBalance::Table)
                    .col(VacationBalance::EmployeeId)
                    .col(VacationBalance::Year)
                    .col(VacationBalance::VacationTypeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(VacationAuditLog::Table)
                    .if_not_exists()
                    .col(pk_auto(VacationAuditLog::Id))
                    .col(integer(VacationAuditLog::EmployeeId))
                    .col(integer(VacationAuditLog::BalanceId))
                    .col(integer(VacationAuditLog::Year))
                    .col(integer(VacationAuditLog::VacationTypeId))
                    .col(string(VacationAuditLog::Operation))
                    .col(double(VacationAuditLog::ChangeDays))
                    .col(json_null(VacationAuditLog::BeforeSnapshot))
                    .col(json_null(VacationAuditLog::AfterSnapshot))
                    .col(text_null(VacationAuditLog::Reason))
                    .col(integer_null(VacationAuditLog::OperatorId))
                    .col(
                        timestamp_with_time_zone(VacationAuditLog::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vacation_audit_log_balance_id")
                            .from(VacationAuditLog::Table, VacationAuditLog::BalanceId)
                            .to(VacationBalance::Table, VacationBalance::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vacation_audit_log_employee_year")
                    .table(VacationAuditLog::Table)
                    .col(VacationAuditLog::EmployeeId)
                    .col(VacationAuditLog::Year)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VacationAuditLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VacationBalance::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConversionRule::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Holiday::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(VacationType::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum VacationType {
    Table,
    Id,
    Code,
    Name,
    Description,
    Enabled,
    SortOrder,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum Holiday {
    Table,
    Id,
    Name,
    Days,
    Month,
    Year,
    VacationTypeId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ConversionRule {
    Table,
    Id,
    Name,
    SourceType,
    TargetType,
    Ratio,
    Enabled,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum VacationBalance {
    Table,
    Id,
    EmployeeId,
    Year,
    VacationTypeId,
    TotalDays,
    ConvertedDays,
    AdjustedDays,
    UsedDays,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum VacationAuditLog {
    Table,
    Id,
    EmployeeId,
    BalanceId,
    Year,
    VacationTypeId,
    Operation,
    ChangeDays,
    BeforeSnapshot,
    AfterSnapshot,
    Reason,
    OperatorId,
    CreatedAt,
}

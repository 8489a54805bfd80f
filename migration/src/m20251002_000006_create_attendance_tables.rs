use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20251001_000003_create_employee_table::Employee,
    m20251002_000005_create_vacation_tables::VacationType,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OvertimeRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(OvertimeRecord::Id))
                    .col(integer(OvertimeRecord::EmployeeId))
                    .col(date(OvertimeRecord::OvertimeDate))
                    .col(timestamp_with_time_zone(OvertimeRecord::StartTime))
                    .col(timestamp_with_time_zone(OvertimeRecord::EndTime))
                    .col(double(OvertimeRecord::Hours))
                    .col(text(OvertimeRecord::Reason).default(""))
                    .col(string(OvertimeRecord::Status).default("pending"))
                    .col(integer_null(OvertimeRecord::ApproverId))
                    .col(timestamp_with_time_zone_null(OvertimeRecord::ApprovedAt))
                    .col(text_null(OvertimeRecord::ApprovalNote))
                    .col(
                        timestamp_with_time_zone(OvertimeRecord::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_overtime_record_employee_id")
                            .from(OvertimeRecord::Table, OvertimeRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(OvertimeConversion::Table)
                    .if_not_exists()
                    .col(pk_auto(OvertimeConversion::Id))
                    .col(integer(OvertimeConversion::EmployeeId))
                    .col(integer(OvertimeConversion::Year))
                    .col(double(OvertimeConversion::OvertimeHours))
                    .col(integer(OvertimeConversion::VacationTypeId))
                    .col(double(OvertimeConversion::ConvertedDays))
                    .col(integer_null(OvertimeConversion::ConversionRuleId))
                    .col(double(OvertimeConversion::ConversionRatio))
                    .col(integer_null(OvertimeConversion::CreatedBy))
                    .col(
                        timestamp_with_time_zone(OvertimeConversion::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_overtime_conversion_employee_id")
                            .from(OvertimeConversion::Table, OvertimeConversion::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_overtime_conversion_vacation_type_id")
                            .from(OvertimeConversion::Table, OvertimeConversion::VacationTypeId)
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
                    .table(LeaveRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(LeaveRecord::Id))
                    .col(integer(LeaveRecord::EmployeeId))
                    .col(integer(LeaveRecord::VacationTypeId))
                    .col(date(LeaveRecord::StartDate))
                    .col(date(LeaveRecord::EndDate))
                    .col(double(LeaveRecord::Days))
                    .col(text_null(LeaveRecord::Reason))
                    .col(string(LeaveRecord::Status).default("pending"))
                    .col(integer_null(LeaveRecord::ApproverId))
                    .col(timestamp_with_time_zone_null(LeaveRecord::ApprovedAt))
                    .col(text_null(LeaveRecord::ApprovalNote))
                    .col(
                        timestamp_with_time_zone(LeaveRecord::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_record_employee_id")
                            .from(LeaveRecord::Table, LeaveRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_leave_record_vacation_type_id")
                            .from(LeaveRecord::Table, LeaveRecord::VacationTypeId)
                            .to(VacationType::Table, VacationType::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(LeaveRecord::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OvertimeConversion::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OvertimeRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum OvertimeRecord {
    Table,
    Id,
    EmployeeId,
    OvertimeDate,
    StartTime,
    EndTime,
    Hours,
    Reason,
    Status,
    ApproverId,
    ApprovedAt,
    ApprovalNote,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum OvertimeConversion {
    Table,
    Id,
    EmployeeId,
    Year,
    OvertimeHours,
    VacationTypeId,
    ConvertedDays,
    ConversionRuleId,
    ConversionRatio,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum LeaveRecord {
    Table,
    Id,
    EmployeeId,
    VacationTypeId,
    StartDate,
    EndDate,
    Days,
    Reason,
    Status,
    ApproverId,
    ApprovedAt,
    ApprovalNote,
    CreatedAt,
}

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
                    .table(AttendanceRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(AttendanceRecord::Id))
                    .col(integer(AttendanceRecord::EmployeeId))
                    .col(date(AttendanceRecord::RecordDate))
                    .col(timestamp_with_time_zone_null(AttendanceRecord::ClockInTime))
                    .col(timestamp_with_time_zone_null(AttendanceRecord::ClockOutTime))
                    .col(double_null(AttendanceRecord::WorkHours))
                    .col(string(AttendanceRecord::Status).default("normal"))
                    .col(
                        timestamp_with_time_zone(AttendanceRecord::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(AttendanceRecord::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_attendance_record_employee_id")
                            .from(AttendanceRecord::Table, AttendanceRecord::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_attendance_record_employee_date")
                    .table(AttendanceRecord::Table)
                    .col(AttendanceRecord::EmployeeId)
                    .col(AttendanceRecord::RecordDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AttendanceRecord::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum AttendanceRecord {
    Table,
    Id,
    EmployeeId,
    RecordDate,
    ClockInTime,
    ClockOutTime,
    WorkHours,
    Status,
    CreatedAt,
    UpdatedAt,
}

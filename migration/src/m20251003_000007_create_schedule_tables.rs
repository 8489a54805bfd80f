use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20251001_000001_create_department_table::Department,
    m20251001_000003_create_employee_table::Employee,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkShift::Table)
                    .if_not_exists()
                    .col(pk_auto(WorkShift::Id))
                    .col(string(WorkShift::Name))
                    .col(string_len(WorkShift::StartTime, 5))
                    .col(string_len(WorkShift::EndTime, 5))
                    .col(string_len(WorkShift::Color, 7))
                    .col(boolean(WorkShift::IsRest).default(false))
                    .col(integer_null(WorkShift::DepartmentId))
                    .col(
                        timestamp_with_time_zone(WorkShift::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_work_shift_department_id")
                            .from(WorkShift::Table, WorkShift::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ShiftSchedule::Table)
                    .if_not_exists()
                    .col(pk_auto(ShiftSchedule::Id))
                    .col(integer(ShiftSchedule::EmployeeId))
                    .col(date(ShiftSchedule::ScheduleDate))
                    .col(integer(ShiftSchedule::ShiftId))
                    .col(boolean(ShiftSchedule::IsRestDay).default(false))
                    .col(text_null(ShiftSchedule::Note))
                    .col(
                        timestamp_with_time_zone(ShiftSchedule::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(ShiftSchedule::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shift_schedule_employee_id")
                            .from(ShiftSchedule::Table, ShiftSchedule::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_shift_schedule_shift_id")
                            .from(ShiftSchedule::Table, ShiftSchedule::ShiftId)
                            .to(WorkShift::Table, WorkShift::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_shift_schedule_employee_date")
                    .table(ShiftSchedule::Table)
                    .col(ShiftSchedule::EmployeeId)
                    .col(ShiftSchedule::ScheduleDate)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ShiftSchedule::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkShift::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum WorkShift {
    Table,
    Id,
    Name,
    StartTime,
    EndTime,
    Color,
    IsRest,
    DepartmentId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ShiftSchedule {
    Table,
    Id,
    EmployeeId,
    ScheduleDate,
    ShiftId,
    IsRestDay,
    Note,
    CreatedAt,
    UpdatedAt,
}

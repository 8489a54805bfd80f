use sea_orm_migration::{prelude::*, schema::*};

use super::m20251001_000002_create_user_table::User;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employee::Table)
                    .if_not_exists()
                    .col(pk_auto(Employee::Id))
                    .col(integer_uniq(Employee::UserId))
                    .col(string_uniq(Employee::EmployeeNo))
                    .col(string_null(Employee::Position))
                    .col(date_null(Employee::HireDate))
                    .col(string(Employee::Status).default("active"))
                    .col(
                        timestamp_with_time_zone(Employee::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_employee_user_id")
                            .from(Employee::Table, Employee::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employee::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Employee {
    Table,
    Id,
    UserId,
    EmployeeNo,
    Position,
    HireDate,
    Status,
    CreatedAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use super::m20251001_000001_create_department_table::Department;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_uniq(User::Username))
                    .col(string(User::PasswordHash))
                    .col(string(User::RealName))
                    .col(string_null(User::Email))
                    .col(string_null(User::Phone))
                    .col(integer_null(User::DepartmentId))
                    .col(string(User::Status).default("active"))
                    .col(
                        timestamp_with_time_zone(User::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(timestamp_with_time_zone_null(User::LastLoginAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_user_department_id")
                            .from(User::Table, User::DepartmentId)
                            .to(Department::Table, Department::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum User {
    Table,
    Id,
    Username,
    PasswordHash,
    RealName,
    Email,
    Phone,
    DepartmentId,
    Status,
    CreatedAt,
    LastLoginAt,
}

use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20251001_000002_create_user_table::User, m20251001_000003_create_employee_table::Employee,
    m20251001_000004_create_role_tables::Permission,
};

const PERMISSIONS: &[(&str, &str, &str)] = &[(
    "reimbursement:approve",
    "Approve reimbursement claims",
    "finance",
)];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reimbursement::Table)
                    .if_not_exists()
                    .col(pk_auto(Reimbursement::Id))
                    .col(string_null(Reimbursement::ReimbursementNo).unique_key())
                    .col(integer(Reimbursement::EmployeeId))
                    .col(integer(Reimbursement::UserId))
                    .col(integer_null(Reimbursement::DepartmentId))
                    .col(string(Reimbursement::Title))
                    .col(string(Reimbursement::Kind))
                    .col(decimal_len(Reimbursement::TotalAmount, 12, 2))
                    .col(text_null(Reimbursement::Remark))
                    .col(string(Reimbursement::Status).default("draft"))
                    .col(timestamp_with_time_zone_null(Reimbursement::SubmittedAt))
                    .col(integer_null(Reimbursement::ApproverId))
                    .col(timestamp_with_time_zone_null(Reimbursement::DecidedAt))
                    .col(text_null(Reimbursement::Opinion))
                    .col(
                        timestamp_with_time_zone(Reimbursement::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Reimbursement::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reimbursement_employee_id")
                            .from(Reimbursement::Table, Reimbursement::EmployeeId)
                            .to(Employee::Table, Employee::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reimbursement_user_id")
                            .from(Reimbursement::Table, Reimbursement::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReimbursementItem::Table)
                    .if_not_exists()
                    .col(pk_auto(ReimbursementItem::Id))
                    .col(integer(ReimbursementItem::ReimbursementId))
                    .col(string(ReimbursementItem::ItemType))
                    .col(decimal_len(ReimbursementItem::Amount, 12, 2))
                    .col(date_null(ReimbursementItem::ExpenseDate))
                    .col(text_null(ReimbursementItem::Description))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reimbursement_item_reimbursement_id")
                            .from(ReimbursementItem::Table, ReimbursementItem::ReimbursementId)
                            .to(Reimbursement::Table, Reimbursement::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ReimbursementLog::Table)
                    .if_not_exists()
                    .col(pk_auto(ReimbursementLog::Id))
                    .col(integer(ReimbursementLog::ReimbursementId))
                    .col(string(ReimbursementLog::Action))
                    .col(string_null(ReimbursementLog::FromStatus))
                    .col(string(ReimbursementLog::ToStatus))
                    .col(integer(ReimbursementLog::OperatorId))
                    .col(text_null(ReimbursementLog::Opinion))
                    .col(
                        timestamp_with_time_zone(ReimbursementLog::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reimbursement_log_reimbursement_id")
                            .from(ReimbursementLog::Table, ReimbursementLog::ReimbursementId)
                            .to(Reimbursement::Table, Reimbursement::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(Permission::Table)
            .columns([Permission::Code, Permission::Name, Permission::Module]);
        for (code, name, module) in PERMISSIONS {
            seed.values([(*code).into(), (*name).into(), (*module).into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Permission::Table)
                    .and_where(
                        Expr::col(Permission::Code)
                            .is_in(PERMISSIONS.iter().map(|(code, _, _)| *code)),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ReimbursementLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReimbursementItem::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Reimbursement::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Reimbursement {
    Table,
    Id,
    ReimbursementNo,
    EmployeeId,
    UserId,
    DepartmentId,
    Title,
    Kind,
    TotalAmount,
    Remark,
    Status,
    SubmittedAt,
    ApproverId,
    DecidedAt,
    Opinion,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ReimbursementItem {
    Table,
    Id,
    ReimbursementId,
    ItemType,
    Amount,
    ExpenseDate,
    Description,
}

#[derive(DeriveIden)]
pub enum ReimbursementLog {
    Table,
    Id,
    ReimbursementId,
    Action,
    FromStatus,
    ToStatus,
    OperatorId,
    Opinion,
    CreatedAt,
}

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
                    .table(Memo::Table)
                    .if_not_exists()
                    .col(pk_auto(Memo::Id))
                    .col(string(Memo::Title))
                    .col(text(Memo::Content))
                    .col(string(Memo::MemoType))
                    .col(string(Memo::Priority).default("normal"))
                    .col(integer(Memo::CreatedBy))
                    .col(boolean(Memo::IsDeleted).default(false))
                    .col(
                        timestamp_with_time_zone(Memo::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(Memo::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memo_created_by")
                            .from(Memo::Table, Memo::CreatedBy)
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
                    .table(MemoRecipient::Table)
                    .if_not_exists()
                    .col(pk_auto(MemoRecipient::Id))
                    .col(integer(MemoRecipient::MemoId))
                    .col(integer(MemoRecipient::UserId))
                    .col(boolean(MemoRecipient::IsRead).default(false))
                    .col(timestamp_with_time_zone_null(MemoRecipient::ReadAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memo_recipient_memo_id")
                            .from(MemoRecipient::Table, MemoRecipient::MemoId)
                            .to(Memo::Table, Memo::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_memo_recipient_user_id")
                            .from(MemoRecipient::Table, MemoRecipient::UserId)
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
            .drop_table(Table::drop().table(MemoRecipient::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Memo::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Memo {
    Table,
    Id,
    Title,
    Content,
    MemoType,
    Priority,
    CreatedBy,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum MemoRecipient {
    Table,
    Id,
    MemoId,
    UserId,
    IsRead,
    ReadAt,
}

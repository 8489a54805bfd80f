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
                    .table(Broadcast::Table)
                    .if_not_exists()
                    .col(pk_auto(Broadcast::Id))
                    .col(string(Broadcast::Title))
                    .col(text(Broadcast::Content))
                    .col(string(Broadcast::Priority).default("normal"))
                    .col(string(Broadcast::TargetType))
                    .col(timestamp_with_time_zone_null(Broadcast::ExpiresAt))
                    .col(integer(Broadcast::CreatedBy))
                    .col(
                        timestamp_with_time_zone(Broadcast::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broadcast_created_by")
                            .from(Broadcast::Table, Broadcast::CreatedBy)
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
                    .table(BroadcastTarget::Table)
                    .if_not_exists()
                    .col(integer(BroadcastTarget::BroadcastId))
                    .col(integer(BroadcastTarget::TargetId))
                    .primary_key(
                        Index::create()
                            .col(BroadcastTarget::BroadcastId)
                            .col(BroadcastTarget::TargetId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broadcast_target_broadcast_id")
                            .from(BroadcastTarget::Table, BroadcastTarget::BroadcastId)
                            .to(Broadcast::Table, Broadcast::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BroadcastRecipient::Table)
                    .if_not_exists()
                    .col(pk_auto(BroadcastRecipient::Id))
                    .col(integer(BroadcastRecipient::BroadcastId))
                    .col(integer(BroadcastRecipient::UserId))
                    .col(boolean(BroadcastRecipient::IsRead).default(false))
                    .col(timestamp_with_time_zone_null(BroadcastRecipient::ReadAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broadcast_recipient_broadcast_id")
                            .from(BroadcastRecipient::Table, BroadcastRecipient::BroadcastId)
                            .to(Broadcast::Table, Broadcast::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_broadcast_recipient_user_id")
                            .from(BroadcastRecipient::Table, BroadcastRecipient::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_broadcast_recipient_broadcast_user")
                    .table(BroadcastRecipient::Table)
                    .col(BroadcastRecipient::BroadcastId)
                    .col(BroadcastRecipient::UserId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BroadcastRecipient::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BroadcastTarget::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Broadcast::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Broadcast {
    Table,
    Id,
    Title,
    Content,
    Priority,
    TargetType,
    ExpiresAt,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum BroadcastTarget {
    Table,
    BroadcastId,
    TargetId,
}

#[derive(DeriveIden)]
pub enum BroadcastRecipient {
    Table,
    Id,
    BroadcastId,
    UserId,
    IsRead,
    ReadAt,
}

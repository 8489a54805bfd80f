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
                    .table(ChatGroup::Table)
                    .if_not_exists()
                    .col(pk_auto(ChatGroup::Id))
                    .col(string(ChatGroup::Name))
                    .col(integer_null(ChatGroup::DepartmentId))
                    .col(integer(ChatGroup::CreatedBy))
                    .col(
                        timestamp_with_time_zone(ChatGroup::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatGroupMember::Table)
                    .if_not_exists()
                    .col(pk_auto(ChatGroupMember::Id))
                    .col(integer(ChatGroupMember::GroupId))
                    .col(integer(ChatGroupMember::UserId))
                    .col(string(ChatGroupMember::Role).default("member"))
                    .col(boolean(ChatGroupMember::IsMuted).default(false))
                    .col(integer_null(ChatGroupMember::LastReadMessageId))
                    .col(
                        timestamp_with_time_zone(ChatGroupMember::JoinedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_group_member_group_id")
                            .from(ChatGroupMember::Table, ChatGroupMember::GroupId)
                            .to(ChatGroup::Table, ChatGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_group_member_user_id")
                            .from(ChatGroupMember::Table, ChatGroupMember::UserId)
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
                    .name("idx_chat_group_member_group_user")
                    .table(ChatGroupMember::Table)
                    .col(ChatGroupMember::GroupId)
                    .col(ChatGroupMember::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ChatMessage::Table)
                    .if_not_exists()
                    .col(pk_auto(ChatMessage::Id))
                    .col(integer(ChatMessage::GroupId))
                    .col(integer(ChatMessage::SenderId))
                    .col(text(ChatMessage::Content))
                    .col(
                        timestamp_with_time_zone(ChatMessage::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_message_group_id")
                            .from(ChatMessage::Table, ChatMessage::GroupId)
                            .to(ChatGroup::Table, ChatGroup::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ChatMessage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatGroupMember::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ChatGroup::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ChatGroup {
    Table,
    Id,
    Name,
    DepartmentId,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum ChatGroupMember {
    Table,
    Id,
    GroupId,
    UserId,
    Role,
    IsMuted,
    LastReadMessageId,
    JoinedAt,
}

#[derive(DeriveIden)]
pub enum ChatMessage {
    Table,
    Id,
    GroupId,
    SenderId,
    Content,
    CreatedAt,
}

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::chat::member_role;

pub struct ChatRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ChatRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a group with `created_by` as admin and `member_ids` as members.
    pub async fn create_group(
        &self,
        name: String,
        department_id: Option<i32>,
        created_by: i32,
        member_ids: &[i32],
    ) -> Result<entity::chat_group::Model, DbErr> {
        let group = entity::chat_group::ActiveModel {
            name: ActiveValue::Set(name),
            department_id: ActiveValue::Set(department_id),
            created_by: ActiveValue::Set(created_by),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.add_member(group.id, created_by, member_role::ADMIN).await?;
        for user_id in member_ids.iter().filter(|id| **id != created_by) {
            self.add_member(group.id, *user_id, member_role::MEMBER).await?;
        }

        Ok(group)
    }

    pub async fn find_group(&self, id: i32) -> Result<Option<entity::chat_group::Model>, DbErr> {
        entity::prelude::ChatGroup::find_by_id(id).one(self.db).await
    }

    /// Groups the user belongs to with the user's membership row.
    pub async fn groups_for_user(
        &self,
        user_id: i32,
    ) -> Result<Vec<(entity::chat_group::Model, entity::chat_group_member::Model)>, DbErr> {
        let memberships = entity::prelude::ChatGroupMember::find()
            .filter(entity::chat_group_member::Column::UserId.eq(user_id))
            .all(self.db)
            .await?;
        if memberships.is_empty() {
            return Ok(Vec::new());
        }

        let mut groups: HashMap<i32, entity::chat_group::Model> = entity::prelude::ChatGroup::find()
            .filter(
                entity::chat_group::Column::Id
                    .is_in(memberships.iter().map(|m| m.group_id).collect::<Vec<_>>()),
            )
            .all(self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let mut rows: Vec<_> = memberships
            .into_iter()
            .filter_map(|m| groups.remove(&m.group_id).map(|g| (g, m)))
            .collect();
        rows.sort_by_key(|(group, _)| group.id);
        Ok(rows)
    }

    pub async fn membership(
        &self,
        group_id: i32,
        user_id: i32,
    ) -> Result<Option<entity::chat_group_member::Model>, DbErr> {
        entity::prelude::ChatGroupMember::find()
            .filter(entity::chat_group_member::Column::GroupId.eq(group_id))
            .filter(entity::chat_group_member::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn members(&self, group_id: i32) -> Result<Vec<entity::chat_group_member::Model>, DbErr> {
        entity::prelude::ChatGroupMember::find()
            .filter(entity::chat_group_member::Column::GroupId.eq(group_id))
            .order_by_asc(entity::chat_group_member::Column::JoinedAt)
            .order_by_asc(entity::chat_group_member::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn member_count(&self, group_id: i32) -> Result<u64, DbErr> {
        entity::prelude::ChatGroupMember::find()
            .filter(entity::chat_group_member::Column::GroupId.eq(group_id))
            .count(self.db)
            .await
    }

    pub async fn add_member(
        &self,
        group_id: i32,
        user_id: i32,
        role: &str,
    ) -> Result<entity::chat_group_member::Model, DbErr> {
        entity::chat_group_member::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            user_id: ActiveValue::Set(user_id),
            role: ActiveValue::Set(role.to_string()),
            is_muted: ActiveValue::Set(false),
            joined_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn remove_member(&self, group_id: i32, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::ChatGroupMember::delete_many()
            .filter(entity::chat_group_member::Column::GroupId.eq(group_id))
            .filter(entity::chat_group_member::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn set_muted(
        &self,
        member: entity::chat_group_member::Model,
        muted: bool,
    ) -> Result<entity::chat_group_member::Model, DbErr> {
        let mut active_model: entity::chat_group_member::ActiveModel = member.into();
        active_model.is_muted = ActiveValue::Set(muted);
        active_model.update(self.db).await
    }

    pub async fn set_last_read(
        &self,
        member: entity::chat_group_member::Model,
        message_id: i32,
    ) -> Result<entity::chat_group_member::Model, DbErr> {
        let mut active_model: entity::chat_group_member::ActiveModel = member.into();
        active_model.last_read_message_id = ActiveValue::Set(Some(message_id));
        active_model.update(self.db).await
    }

    pub async fn create_message(
        &self,
        group_id: i32,
        sender_id: i32,
        content: String,
    ) -> Result<entity::chat_message::Model, DbErr> {
        entity::chat_message::ActiveModel {
            group_id: ActiveValue::Set(group_id),
            sender_id: ActiveValue::Set(sender_id),
            content: ActiveValue::Set(content),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Up to `limit` messages older than `before_id`, returned oldest first.
    pub async fn history(
        &self,
        group_id: i32,
        before_id: Option<i32>,
        limit: u64,
    ) -> Result<Vec<entity::chat_message::Model>, DbErr> {
        let mut query = entity::prelude::ChatMessage::find()
            .filter(entity::chat_message::Column::GroupId.eq(group_id));
        if let Some(before_id) = before_id {
            query = query.filter(entity::chat_message::Column::Id.lt(before_id));
        }

        let mut messages = query
            .order_by_desc(entity::chat_message::Column::Id)
            .limit(limit)
            .all(self.db)
            .await?;
        messages.reverse();
        Ok(messages)
    }

    pub async fn last_message(&self, group_id: i32) -> Result<Option<entity::chat_message::Model>, DbErr> {
        entity::prelude::ChatMessage::find()
            .filter(entity::chat_message::Column::GroupId.eq(group_id))
            .order_by_desc(entity::chat_message::Column::Id)
            .one(self.db)
            .await
    }

    /// Messages from other members after the member's read position.
    pub async fn unread_count(&self, member: &entity::chat_group_member::Model) -> Result<u64, DbErr> {
        let mut query = entity::prelude::ChatMessage::find()
            .filter(entity::chat_message::Column::GroupId.eq(member.group_id))
            .filter(entity::chat_message::Column::SenderId.ne(member.user_id));
        if let Some(last_read) = member.last_read_message_id {
            query = query.filter(entity::chat_message::Column::Id.gt(last_read));
        }
        query.count(self.db).await
    }
}

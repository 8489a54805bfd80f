use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait,
    DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::broadcast::{CreateBroadcastParams, ReadStats};

pub struct BroadcastRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BroadcastRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts the broadcast, its targets and one recipient row per user.
    pub async fn create(
        &self,
        params: CreateBroadcastParams,
        recipient_ids: &[i32],
    ) -> Result<entity::broadcast::Model, DbErr> {
        let broadcast = entity::broadcast::ActiveModel {
            title: ActiveValue::Set(params.title),
            content: ActiveValue::Set(params.content),
            priority: ActiveValue::Set(params.priority),
            target_type: ActiveValue::Set(params.target_type.as_str().to_string()),
            expires_at: ActiveValue::Set(params.expires_at),
            created_by: ActiveValue::Set(params.created_by),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        for target_id in &params.target_ids {
            entity::broadcast_target::ActiveModel {
                broadcast_id: ActiveValue::Set(broadcast.id),
                target_id: ActiveValue::Set(*target_id),
            }
            .insert(self.db)
            .await?;
        }

        for user_id in recipient_ids {
            entity::broadcast_recipient::ActiveModel {
                broadcast_id: ActiveValue::Set(broadcast.id),
                user_id: ActiveValue::Set(*user_id),
                is_read: ActiveValue::Set(false),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(broadcast)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::broadcast::Model>, DbErr> {
        entity::prelude::Broadcast::find_by_id(id).one(self.db).await
    }

    /// Broadcasts sent by `created_by` (all when `None`), newest first.
    pub async fn get_sent_paginated(
        &self,
        created_by: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::broadcast::Model>, u64), DbErr> {
        let mut query = entity::prelude::Broadcast::find();
        if let Some(user_id) = created_by {
            query = query.filter(entity::broadcast::Column::CreatedBy.eq(user_id));
        }

        let paginator = query
            .order_by_desc(entity::broadcast::Column::CreatedAt)
            .order_by_desc(entity::broadcast::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let broadcasts = paginator.fetch_page(page).await?;
        Ok((broadcasts, total))
    }

    /// Unexpired broadcasts received by the user, newest first.
    pub async fn get_received_paginated(
        &self,
        user_id: i32,
        is_read: Option<bool>,
        now: DateTime<Utc>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<(entity::broadcast_recipient::Model, entity::broadcast::Model)>, u64), DbErr>
    {
        let mut query = entity::prelude::BroadcastRecipient::find()
            .filter(entity::broadcast_recipient::Column::UserId.eq(user_id));
        if let Some(is_read) = is_read {
            query = query.filter(entity::broadcast_recipient::Column::IsRead.eq(is_read));
        }

        let unexpired: Vec<i32> = entity::prelude::Broadcast::find()
            .select_only()
            .column(entity::broadcast::Column::Id)
            .filter(
                Condition::any()
                    .add(entity::broadcast::Column::ExpiresAt.is_null())
                    .add(entity::broadcast::Column::ExpiresAt.gt(now)),
            )
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        let paginator = query
            .filter(entity::broadcast_recipient::Column::BroadcastId.is_in(unexpired))
            .order_by_desc(entity::broadcast_recipient::Column::BroadcastId)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let recipients = paginator.fetch_page(page).await?;

        let ids: Vec<i32> = recipients.iter().map(|r| r.broadcast_id).collect();
        let mut broadcasts: HashMap<i32, entity::broadcast::Model> = if ids.is_empty() {
            HashMap::new()
        } else {
            entity::prelude::Broadcast::find()
                .filter(entity::broadcast::Column::Id.is_in(ids))
                .all(self.db)
                .await?
                .into_iter()
                .map(|b| (b.id, b))
                .collect()
        };

        let rows = recipients
            .into_iter()
            .filter_map(|r| broadcasts.remove(&r.broadcast_id).map(|b| (r, b)))
            .collect();

        Ok((rows, total))
    }

    /// Marks the user's copy read. Returns the rows affected.
    pub async fn mark_read(&self, broadcast_id: i32, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::BroadcastRecipient::update_many()
            .col_expr(entity::broadcast_recipient::Column::IsRead, Expr::value(true))
            .col_expr(entity::broadcast_recipient::Column::ReadAt, Expr::value(Some(Utc::now())))
            .filter(entity::broadcast_recipient::Column::BroadcastId.eq(broadcast_id))
            .filter(entity::broadcast_recipient::Column::UserId.eq(user_id))
            .filter(entity::broadcast_recipient::Column::IsRead.eq(false))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn is_recipient(&self, broadcast_id: i32, user_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::BroadcastRecipient::find()
            .filter(entity::broadcast_recipient::Column::BroadcastId.eq(broadcast_id))
            .filter(entity::broadcast_recipient::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;
        Ok(count > 0)
    }

    /// Removes the broadcast with its targets and recipients.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        entity::prelude::BroadcastRecipient::delete_many()
            .filter(entity::broadcast_recipient::Column::BroadcastId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::BroadcastTarget::delete_many()
            .filter(entity::broadcast_target::Column::BroadcastId.eq(id))
            .exec(self.db)
            .await?;
        let result = entity::prelude::Broadcast::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn recipients(
        &self,
        broadcast_id: i32,
    ) -> Result<Vec<entity::broadcast_recipient::Model>, DbErr> {
        entity::prelude::BroadcastRecipient::find()
            .filter(entity::broadcast_recipient::Column::BroadcastId.eq(broadcast_id))
            .order_by_asc(entity::broadcast_recipient::Column::UserId)
            .all(self.db)
            .await
    }

    pub async fn target_ids(&self, broadcast_ids: &[i32]) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
        if broadcast_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let mut targets: HashMap<i32, Vec<i32>> = HashMap::new();
        let rows = entity::prelude::BroadcastTarget::find()
            .filter(entity::broadcast_target::Column::BroadcastId.is_in(broadcast_ids.to_vec()))
            .order_by_asc(entity::broadcast_target::Column::TargetId)
            .all(self.db)
            .await?;
        for row in rows {
            targets.entry(row.broadcast_id).or_default().push(row.target_id);
        }
        Ok(targets)
    }

    pub async fn read_stats(&self, broadcast_ids: &[i32]) -> Result<HashMap<i32, ReadStats>, DbErr> {
        if broadcast_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = entity::prelude::BroadcastRecipient::find()
            .filter(entity::broadcast_recipient::Column::BroadcastId.is_in(broadcast_ids.to_vec()))
            .all(self.db)
            .await?;

        let mut stats: HashMap<i32, ReadStats> = HashMap::new();
        for row in rows {
            let entry = stats.entry(row.broadcast_id).or_default();
            entry.recipient_count += 1;
            if row.is_read {
                entry.read_count += 1;
            }
        }
        Ok(stats)
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::notification::{CreateNotificationParams, NotificationFilter};

pub struct NotificationRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> NotificationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        params: CreateNotificationParams,
    ) -> Result<entity::notification::Model, DbErr> {
        entity::notification::ActiveModel {
            user_id: ActiveValue::Set(params.user_id),
            kind: ActiveValue::Set(params.kind),
            title: ActiveValue::Set(params.title),
            content: ActiveValue::Set(params.content),
            related_type: ActiveValue::Set(params.related_type),
            related_id: ActiveValue::Set(params.related_id),
            is_read: ActiveValue::Set(false),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    /// Notifications of a user, newest first.
    pub async fn get_paginated(
        &self,
        user_id: i32,
        filter: &NotificationFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::notification::Model>, u64), DbErr> {
        let mut query = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id));
        if filter.unread_only {
            query = query.filter(entity::notification::Column::IsRead.eq(false));
        }
        if let Some(kind) = &filter.kind {
            query = query.filter(entity::notification::Column::Kind.eq(kind.as_str()));
        }

        let paginator = query
            .order_by_desc(entity::notification::Column::CreatedAt)
            .order_by_desc(entity::notification::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let notifications = paginator.fetch_page(page).await?;
        Ok((notifications, total))
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, DbErr> {
        entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::IsRead.eq(false))
            .count(self.db)
            .await
    }

    /// Marks one of the user's notifications read. Returns the rows affected.
    pub async fn mark_read(&self, user_id: i32, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .col_expr(entity::notification::Column::IsRead, Expr::value(true))
            .col_expr(entity::notification::Column::ReadAt, Expr::value(Some(Utc::now())))
            .filter(entity::notification::Column::Id.eq(id))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::update_many()
            .col_expr(entity::notification::Column::IsRead, Expr::value(true))
            .col_expr(entity::notification::Column::ReadAt, Expr::value(Some(Utc::now())))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::IsRead.eq(false))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::Id.eq(id))
            .filter(entity::notification::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// (kind, total, unread) for each notification kind the user has.
    pub async fn counts_by_kind(&self, user_id: i32) -> Result<Vec<(String, i64, i64)>, DbErr> {
        let totals = entity::prelude::Notification::find()
            .select_only()
            .column(entity::notification::Column::Kind)
            .column_as(entity::notification::Column::Id.count(), "total")
            .filter(entity::notification::Column::UserId.eq(user_id))
            .group_by(entity::notification::Column::Kind)
            .order_by_asc(entity::notification::Column::Kind)
            .into_tuple::<(String, i64)>()
            .all(self.db)
            .await?;

        let unread: std::collections::HashMap<String, i64> = entity::prelude::Notification::find()
            .select_only()
            .column(entity::notification::Column::Kind)
            .column_as(entity::notification::Column::Id.count(), "unread")
            .filter(entity::notification::Column::UserId.eq(user_id))
            .filter(entity::notification::Column::IsRead.eq(false))
            .group_by(entity::notification::Column::Kind)
            .into_tuple::<(String, i64)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        Ok(totals
            .into_iter()
            .map(|(kind, total)| {
                let unread = unread.get(&kind).copied().unwrap_or(0);
                (kind, total, unread)
            })
            .collect())
    }

    /// Deletes read notifications created before `cutoff`.
    pub async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64, DbErr> {
        let result = entity::prelude::Notification::delete_many()
            .filter(entity::notification::Column::IsRead.eq(true))
            .filter(entity::notification::Column::CreatedAt.lt(cutoff))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}

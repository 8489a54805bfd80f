use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::memo::{memo_type, CreateMemoParams};

pub struct MemoRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MemoRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts a memo with one recipient row per user.
    pub async fn create(
        &self,
        params: CreateMemoParams,
        recipient_ids: &[i32],
    ) -> Result<entity::memo::Model, DbErr> {
        let now = Utc::now();
        let memo = entity::memo::ActiveModel {
            title: ActiveValue::Set(params.title),
            content: ActiveValue::Set(params.content),
            memo_type: ActiveValue::Set(params.memo_type.to_string()),
            priority: ActiveValue::Set(params.priority),
            created_by: ActiveValue::Set(params.created_by),
            is_deleted: ActiveValue::Set(false),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        for user_id in recipient_ids {
            entity::memo_recipient::ActiveModel {
                memo_id: ActiveValue::Set(memo.id),
                user_id: ActiveValue::Set(*user_id),
                is_read: ActiveValue::Set(false),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(memo)
    }

    /// Gets a memo that has not been soft-deleted.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::memo::Model>, DbErr> {
        entity::prelude::Memo::find_by_id(id)
            .filter(entity::memo::Column::IsDeleted.eq(false))
            .one(self.db)
            .await
    }

    pub async fn update(
        &self,
        memo: entity::memo::Model,
        title: Option<String>,
        content: Option<String>,
        priority: Option<String>,
    ) -> Result<entity::memo::Model, DbErr> {
        let mut active_model: entity::memo::ActiveModel = memo.clone().into();
        if let Some(title) = title {
            active_model.title = ActiveValue::Set(title);
        }
        if let Some(content) = content {
            active_model.content = ActiveValue::Set(content);
        }
        if let Some(priority) = priority {
            active_model.priority = ActiveValue::Set(priority);
        }
        if !active_model.is_changed() {
            return Ok(memo);
        }
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await
    }

    pub async fn soft_delete(&self, memo: entity::memo::Model) -> Result<(), DbErr> {
        let mut active_model: entity::memo::ActiveModel = memo.into();
        active_model.is_deleted = ActiveValue::Set(true);
        active_model.updated_at = ActiveValue::Set(Utc::now());
        active_model.update(self.db).await?;
        Ok(())
    }

    /// Memos delivered to the user, newest first.
    pub async fn get_received_paginated(
        &self,
        user_id: i32,
        memo_type: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<(entity::memo_recipient::Model, entity::memo::Model)>, u64), DbErr> {
        let mut memo_query = entity::prelude::Memo::find()
            .select_only()
            .column(entity::memo::Column::Id)
            .filter(entity::memo::Column::IsDeleted.eq(false));
        if let Some(memo_type) = memo_type {
            memo_query = memo_query.filter(entity::memo::Column::MemoType.eq(memo_type));
        }
        let memo_ids: Vec<i32> = memo_query.into_tuple::<i32>().all(self.db).await?;

        let paginator = entity::prelude::MemoRecipient::find()
            .filter(entity::memo_recipient::Column::UserId.eq(user_id))
            .filter(entity::memo_recipient::Column::MemoId.is_in(memo_ids))
            .order_by_desc(entity::memo_recipient::Column::MemoId)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let recipients = paginator.fetch_page(page).await?;

        let ids: Vec<i32> = recipients.iter().map(|r| r.memo_id).collect();
        let mut memos: HashMap<i32, entity::memo::Model> = if ids.is_empty() {
            HashMap::new()
        } else {
            entity::prelude::Memo::find()
                .filter(entity::memo::Column::Id.is_in(ids))
                .all(self.db)
                .await?
                .into_iter()
                .map(|m| (m.id, m))
                .collect()
        };

        let rows = recipients
            .into_iter()
            .filter_map(|r| memos.remove(&r.memo_id).map(|m| (r, m)))
            .collect();

        Ok((rows, total))
    }

    /// Unread, non-deleted memos of the user.
    pub async fn unread_count(&self, user_id: i32) -> Result<u64, DbErr> {
        let memo_ids: Vec<i32> = entity::prelude::Memo::find()
            .select_only()
            .column(entity::memo::Column::Id)
            .filter(entity::memo::Column::IsDeleted.eq(false))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        entity::prelude::MemoRecipient::find()
            .filter(entity::memo_recipient::Column::UserId.eq(user_id))
            .filter(entity::memo_recipient::Column::IsRead.eq(false))
            .filter(entity::memo_recipient::Column::MemoId.is_in(memo_ids))
            .count(self.db)
            .await
    }

    pub async fn mark_read(&self, memo_id: i32, user_id: i32) -> Result<u64, DbErr> {
        let result = entity::prelude::MemoRecipient::update_many()
            .col_expr(entity::memo_recipient::Column::IsRead, Expr::value(true))
            .col_expr(entity::memo_recipient::Column::ReadAt, Expr::value(Some(Utc::now())))
            .filter(entity::memo_recipient::Column::MemoId.eq(memo_id))
            .filter(entity::memo_recipient::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn recipient(
        &self,
        memo_id: i32,
        user_id: i32,
    ) -> Result<Option<entity::memo_recipient::Model>, DbErr> {
        entity::prelude::MemoRecipient::find()
            .filter(entity::memo_recipient::Column::MemoId.eq(memo_id))
            .filter(entity::memo_recipient::Column::UserId.eq(user_id))
            .one(self.db)
            .await
    }

    pub async fn recipients(&self, memo_id: i32) -> Result<Vec<entity::memo_recipient::Model>, DbErr> {
        entity::prelude::MemoRecipient::find()
            .filter(entity::memo_recipient::Column::MemoId.eq(memo_id))
            .order_by_asc(entity::memo_recipient::Column::UserId)
            .all(self.db)
            .await
    }

    /// Department memos written by the user, newest first.
    pub async fn get_sent_paginated(
        &self,
        created_by: i32,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::memo::Model>, u64), DbErr> {
        let paginator = entity::prelude::Memo::find()
            .filter(entity::memo::Column::CreatedBy.eq(created_by))
            .filter(entity::memo::Column::MemoType.eq(memo_type::DEPARTMENT))
            .filter(entity::memo::Column::IsDeleted.eq(false))
            .order_by_desc(entity::memo::Column::CreatedAt)
            .order_by_desc(entity::memo::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let memos = paginator.fetch_page(page).await?;
        Ok((memos, total))
    }

    /// (recipients, read) per memo.
    pub async fn read_stats(&self, memo_ids: &[i32]) -> Result<HashMap<i32, (u64, u64)>, DbErr> {
        if memo_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = entity::prelude::MemoRecipient::find()
            .filter(entity::memo_recipient::Column::MemoId.is_in(memo_ids.to_vec()))
            .all(self.db)
            .await?;

        let mut stats: HashMap<i32, (u64, u64)> = HashMap::new();
        for row in rows {
            let entry = stats.entry(row.memo_id).or_default();
            entry.0 += 1;
            if row.is_read {
                entry.1 += 1;
            }
        }
        Ok(stats)
    }
}

use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::reimbursement::{
    claim_number, total_amount, ClaimItem, ClaimStatus, ClaimTransition, CreateClaimParams,
};

/// Which claims a listing returns.
#[derive(Debug, Clone, Default)]
pub struct ClaimFilter {
    pub user_id: Option<i32>,
    pub status: Option<String>,
    /// `None` means every department.
    pub department_ids: Option<Vec<i32>>,
}

pub struct ReimbursementRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> ReimbursementRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Inserts the claim with its items and numbers it from the new id.
    pub async fn create(
        &self,
        params: CreateClaimParams,
        items: &[ClaimItem],
    ) -> Result<entity::reimbursement::Model, DbErr> {
        let now = Utc::now();
        let submitted_at = (params.status == ClaimStatus::Pending).then_some(now);
        let claim = entity::reimbursement::ActiveModel {
            reimbursement_no: ActiveValue::Set(None),
            employee_id: ActiveValue::Set(params.employee_id),
            user_id: ActiveValue::Set(params.user_id),
            department_id: ActiveValue::Set(params.department_id),
            title: ActiveValue::Set(params.title),
            kind: ActiveValue::Set(params.kind),
            total_amount: ActiveValue::Set(total_amount(items)),
            remark: ActiveValue::Set(params.remark),
            status: ActiveValue::Set(params.status.as_str().to_string()),
            submitted_at: ActiveValue::Set(submitted_at),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.insert_items(claim.id, items).await?;

        let mut active_model: entity::reimbursement::ActiveModel = claim.clone().into();
        active_model.reimbursement_no =
            ActiveValue::Set(Some(claim_number(claim.created_at, claim.id)));
        active_model.update(self.db).await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<entity::reimbursement::Model>, DbErr> {
        entity::prelude::Reimbursement::find_by_id(id).one(self.db).await
    }

    /// Rewrites a draft's fields and replaces its items.
    ///
    /// Returns `None` when the claim is no longer a draft.
    pub async fn update_draft(
        &self,
        id: i32,
        title: String,
        kind: String,
        remark: Option<String>,
        items: &[ClaimItem],
    ) -> Result<Option<entity::reimbursement::Model>, DbErr> {
        let result = entity::prelude::Reimbursement::update_many()
            .col_expr(entity::reimbursement::Column::Title, Expr::value(title))
            .col_expr(entity::reimbursement::Column::Kind, Expr::value(kind))
            .col_expr(entity::reimbursement::Column::Remark, Expr::value(remark))
            .col_expr(
                entity::reimbursement::Column::TotalAmount,
                Expr::value(total_amount(items)),
            )
            .col_expr(entity::reimbursement::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::reimbursement::Column::Id.eq(id))
            .filter(entity::reimbursement::Column::Status.eq(ClaimStatus::Draft.as_str()))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }

        entity::prelude::ReimbursementItem::delete_many()
            .filter(entity::reimbursement_item::Column::ReimbursementId.eq(id))
            .exec(self.db)
            .await?;
        self.insert_items(id, items).await?;

        self.find_by_id(id).await
    }

    /// Moves a claim from `from` to `to`, stamping the timestamp that belongs to `to`.
    ///
    /// The update only matches while the claim is still in `from`, so of two
    /// concurrent transitions exactly one wins. Returns `None` for the loser.
    pub async fn transition(
        &self,
        id: i32,
        from: ClaimStatus,
        to: ClaimStatus,
        approver_id: Option<i32>,
        opinion: Option<String>,
    ) -> Result<Option<entity::reimbursement::Model>, DbErr> {
        let now = Utc::now();
        let mut update = entity::prelude::Reimbursement::update_many()
            .col_expr(entity::reimbursement::Column::Status, Expr::value(to.as_str()))
            .col_expr(entity::reimbursement::Column::UpdatedAt, Expr::value(now));
        match to {
            ClaimStatus::Pending => {
                update = update.col_expr(
                    entity::reimbursement::Column::SubmittedAt,
                    Expr::value(Some(now)),
                );
            }
            ClaimStatus::Approved | ClaimStatus::Rejected => {
                update = update
                    .col_expr(
                        entity::reimbursement::Column::ApproverId,
                        Expr::value(approver_id),
                    )
                    .col_expr(
                        entity::reimbursement::Column::DecidedAt,
                        Expr::value(Some(now)),
                    )
                    .col_expr(entity::reimbursement::Column::Opinion, Expr::value(opinion));
            }
            ClaimStatus::Draft | ClaimStatus::Cancelled => {}
        }

        let result = update
            .filter(entity::reimbursement::Column::Id.eq(id))
            .filter(entity::reimbursement::Column::Status.eq(from.as_str()))
            .exec(self.db)
            .await?;
        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_by_id(id).await
    }

    /// Deletes the claim with its items and history.
    pub async fn delete(&self, id: i32) -> Result<(), DbErr> {
        entity::prelude::ReimbursementItem::delete_many()
            .filter(entity::reimbursement_item::Column::ReimbursementId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::ReimbursementLog::delete_many()
            .filter(entity::reimbursement_log::Column::ReimbursementId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::Reimbursement::delete_by_id(id)
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Claims matching the filter, newest first.
    pub async fn get_paginated(
        &self,
        filter: &ClaimFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::reimbursement::Model>, u64), DbErr> {
        let mut query = entity::prelude::Reimbursement::find();
        if let Some(user_id) = filter.user_id {
            query = query.filter(entity::reimbursement::Column::UserId.eq(user_id));
        }
        if let Some(status) = &filter.status {
            query = query.filter(entity::reimbursement::Column::Status.eq(status.as_str()));
        }
        if let Some(ids) = &filter.department_ids {
            query = query.filter(entity::reimbursement::Column::DepartmentId.is_in(ids.clone()));
        }

        let paginator = query
            .order_by_desc(entity::reimbursement::Column::CreatedAt)
            .order_by_desc(entity::reimbursement::Column::Id)
            .paginate(self.db, per_page);

        let total = paginator.num_items().await?;
        let claims = paginator.fetch_page(page).await?;
        Ok((claims, total))
    }

    pub async fn items(&self, id: i32) -> Result<Vec<entity::reimbursement_item::Model>, DbErr> {
        entity::prelude::ReimbursementItem::find()
            .filter(entity::reimbursement_item::Column::ReimbursementId.eq(id))
            .order_by_asc(entity::reimbursement_item::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn logs(&self, id: i32) -> Result<Vec<entity::reimbursement_log::Model>, DbErr> {
        entity::prelude::ReimbursementLog::find()
            .filter(entity::reimbursement_log::Column::ReimbursementId.eq(id))
            .order_by_asc(entity::reimbursement_log::Column::Id)
            .all(self.db)
            .await
    }

    pub async fn log(
        &self,
        reimbursement_id: i32,
        transition: ClaimTransition,
        at: DateTime<Utc>,
    ) -> Result<entity::reimbursement_log::Model, DbErr> {
        entity::reimbursement_log::ActiveModel {
            reimbursement_id: ActiveValue::Set(reimbursement_id),
            action: ActiveValue::Set(transition.action.to_string()),
            from_status: ActiveValue::Set(transition.from.map(|s| s.as_str().to_string())),
            to_status: ActiveValue::Set(transition.to.as_str().to_string()),
            operator_id: ActiveValue::Set(transition.operator_id),
            opinion: ActiveValue::Set(transition.opinion),
            created_at: ActiveValue::Set(at),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    async fn insert_items(&self, reimbursement_id: i32, items: &[ClaimItem]) -> Result<(), DbErr> {
        for item in items {
            entity::reimbursement_item::ActiveModel {
                reimbursement_id: ActiveValue::Set(reimbursement_id),
                item_type: ActiveValue::Set(item.item_type.clone()),
                amount: ActiveValue::Set(item.amount),
                expense_date: ActiveValue::Set(item.expense_date),
                description: ActiveValue::Set(item.description.clone()),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }
        Ok(())
    }
}

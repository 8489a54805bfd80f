use chrono::Utc;
use sea_orm::{
    sea_query::Expr,
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait, ExprTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::server::model::inventory::{
    AuditParams, AuditResult, CreateItemParams, ProcurementParams, StockEntry, UsageParams,
};

pub struct InventoryRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InventoryRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create_item(
        &self,
        params: CreateItemParams,
    ) -> Result<entity::inventory_item::Model, DbErr> {
        let now = Utc::now();
        entity::inventory_item::ActiveModel {
            name: ActiveValue::Set(params.name),
            category: ActiveValue::Set(params.category),
            unit: ActiveValue::Set(params.unit),
            description: ActiveValue::Set(params.description),
            current_stock: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn find_item(&self, id: i32) -> Result<Option<entity::inventory_item::Model>, DbErr> {
        entity::prelude::InventoryItem::find_by_id(id).one(self.db).await
    }

    /// Items ordered by name, optionally narrowed by a name keyword and a category.
    pub async fn list_items(
        &self,
        keyword: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<entity::inventory_item::Model>, DbErr> {
        let mut query = entity::prelude::InventoryItem::find();
        if let Some(keyword) = keyword {
            query = query.filter(entity::inventory_item::Column::Name.contains(keyword));
        }
        if let Some(category) = category {
            query = query.filter(entity::inventory_item::Column::Category.eq(category));
        }
        query
            .order_by_asc(entity::inventory_item::Column::Name)
            .all(self.db)
            .await
    }

    /// Adds `delta` to the stock when the result stays at or above zero.
    ///
    /// Returns `None` without changing anything when the item does not hold enough
    /// stock for a negative `delta`.
    pub async fn add_stock(
        &self,
        item_id: i32,
        delta: i32,
    ) -> Result<Option<entity::inventory_item::Model>, DbErr> {
        let result = entity::prelude::InventoryItem::update_many()
            .col_expr(
                entity::inventory_item::Column::CurrentStock,
                Expr::col(entity::inventory_item::Column::CurrentStock).add(delta),
            )
            .col_expr(entity::inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::inventory_item::Column::Id.eq(item_id))
            .filter(entity::inventory_item::Column::CurrentStock.gte(-delta.min(0)))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_item(item_id).await
    }

    /// Overwrites the stock while it still equals `expected`.
    ///
    /// Returns `None` when another change landed first.
    pub async fn set_stock(
        &self,
        item_id: i32,
        expected: i32,
        actual: i32,
    ) -> Result<Option<entity::inventory_item::Model>, DbErr> {
        let result = entity::prelude::InventoryItem::update_many()
            .col_expr(entity::inventory_item::Column::CurrentStock, Expr::value(actual))
            .col_expr(entity::inventory_item::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(entity::inventory_item::Column::Id.eq(item_id))
            .filter(entity::inventory_item::Column::CurrentStock.eq(expected))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.find_item(item_id).await
    }

    pub async fn record_procurement(
        &self,
        params: ProcurementParams,
    ) -> Result<entity::procurement_record::Model, DbErr> {
        let total_price = params.price_per_unit * rust_decimal::Decimal::from(params.quantity);
        entity::procurement_record::ActiveModel {
            item_id: ActiveValue::Set(params.item_id),
            quantity: ActiveValue::Set(params.quantity),
            price_per_unit: ActiveValue::Set(params.price_per_unit),
            total_price: ActiveValue::Set(total_price),
            supplier: ActiveValue::Set(params.supplier),
            purchase_date: ActiveValue::Set(params.purchase_date),
            purchaser_id: ActiveValue::Set(params.purchaser_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn record_usage(
        &self,
        params: UsageParams,
    ) -> Result<entity::inventory_usage::Model, DbErr> {
        entity::inventory_usage::ActiveModel {
            item_id: ActiveValue::Set(params.item_id),
            quantity: ActiveValue::Set(params.quantity),
            user_id: ActiveValue::Set(params.user_id),
            purpose: ActiveValue::Set(params.purpose),
            operator_id: ActiveValue::Set(params.operator_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn record_audit(
        &self,
        params: AuditParams,
    ) -> Result<entity::inventory_audit::Model, DbErr> {
        let result = AuditResult::of(params.expected_stock, params.actual_stock);
        entity::inventory_audit::ActiveModel {
            item_id: ActiveValue::Set(params.item_id),
            expected_stock: ActiveValue::Set(params.expected_stock),
            actual_stock: ActiveValue::Set(params.actual_stock),
            discrepancy: ActiveValue::Set(params.actual_stock - params.expected_stock),
            result_status: ActiveValue::Set(result.as_str().to_string()),
            auditor_id: ActiveValue::Set(params.auditor_id),
            notes: ActiveValue::Set(params.notes),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn log_stock(
        &self,
        entry: StockEntry,
    ) -> Result<entity::inventory_stock_log::Model, DbErr> {
        entity::inventory_stock_log::ActiveModel {
            item_id: ActiveValue::Set(entry.item_id),
            operation: ActiveValue::Set(entry.operation.as_str().to_string()),
            change: ActiveValue::Set(entry.stock_after - entry.stock_before),
            stock_before: ActiveValue::Set(entry.stock_before),
            stock_after: ActiveValue::Set(entry.stock_after),
            operator_id: ActiveValue::Set(entry.operator_id),
            related_id: ActiveValue::Set(entry.related_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }

    pub async fn procurements(
        &self,
        item_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::procurement_record::Model>, u64), DbErr> {
        let mut query = entity::prelude::ProcurementRecord::find();
        if let Some(item_id) = item_id {
            query = query.filter(entity::procurement_record::Column::ItemId.eq(item_id));
        }
        let paginator = query
            .order_by_desc(entity::procurement_record::Column::Id)
            .paginate(self.db, per_page);
        let total = paginator.num_items().await?;
        Ok((paginator.fetch_page(page).await?, total))
    }

    pub async fn usages(
        &self,
        item_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::inventory_usage::Model>, u64), DbErr> {
        let mut query = entity::prelude::InventoryUsage::find();
        if let Some(item_id) = item_id {
            query = query.filter(entity::inventory_usage::Column::ItemId.eq(item_id));
        }
        let paginator = query
            .order_by_desc(entity::inventory_usage::Column::Id)
            .paginate(self.db, per_page);
        let total = paginator.num_items().await?;
        Ok((paginator.fetch_page(page).await?, total))
    }

    pub async fn audits(
        &self,
        item_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::inventory_audit::Model>, u64), DbErr> {
        let mut query = entity::prelude::InventoryAudit::find();
        if let Some(item_id) = item_id {
            query = query.filter(entity::inventory_audit::Column::ItemId.eq(item_id));
        }
        let paginator = query
            .order_by_desc(entity::inventory_audit::Column::Id)
            .paginate(self.db, per_page);
        let total = paginator.num_items().await?;
        Ok((paginator.fetch_page(page).await?, total))
    }

    /// Stock ledger, newest first.
    pub async fn stock_logs(
        &self,
        item_id: Option<i32>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<entity::inventory_stock_log::Model>, u64), DbErr> {
        let mut query = entity::prelude::InventoryStockLog::find();
        if let Some(item_id) = item_id {
            query = query.filter(entity::inventory_stock_log::Column::ItemId.eq(item_id));
        }
        let paginator = query
            .order_by_desc(entity::inventory_stock_log::Column::Id)
            .paginate(self.db, per_page);
        let total = paginator.num_items().await?;
        Ok((paginator.fetch_page(page).await?, total))
    }
}

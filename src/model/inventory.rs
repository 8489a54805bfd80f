use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct InventoryItemDto {
    pub id: i32,
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
    pub current_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct InventoryItemQueryDto {
    /// Case-insensitive match on the item name.
    pub keyword: Option<String>,
    pub category: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateInventoryItemDto {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

/// Stocks up an existing item, or a new one described by `new_item`.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ProcureDto {
    pub item_id: Option<i32>,
    pub new_item: Option<CreateInventoryItemDto>,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub supplier: Option<String>,
    /// Defaults to today in office time.
    pub purchase_date: Option<NaiveDate>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct UseItemDto {
    pub item_id: i32,
    pub quantity: i32,
    /// Recipient; defaults to the caller. Issuing to others needs `inventory:manage`.
    pub user_id: Option<i32>,
    pub purpose: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct AuditItemDto {
    pub item_id: i32,
    /// Counted stock.
    pub actual_stock: i32,
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct StockLogDto {
    pub id: i32,
    pub item_id: i32,
    pub operation: String,
    pub change: i32,
    pub stock_before: i32,
    pub stock_after: i32,
    pub operator_id: i32,
    pub related_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// The item after a stock change and the ledger row describing it.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct StockChangeDto {
    pub item: InventoryItemDto,
    pub log: StockLogDto,
}

/// A stock count and the resulting stock change.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct AuditOutcomeDto {
    pub audit: InventoryAuditDto,
    pub change: StockChangeDto,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ProcurementDto {
    pub id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_price: Decimal,
    pub supplier: Option<String>,
    pub purchase_date: NaiveDate,
    pub purchaser_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct UsageDto {
    pub id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub user_id: i32,
    pub purpose: Option<String>,
    pub operator_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct InventoryAuditDto {
    pub id: i32,
    pub item_id: i32,
    pub expected_stock: i32,
    pub actual_stock: i32,
    pub discrepancy: i32,
    /// `matched`, `missing` or `surplus`.
    pub result_status: String,
    pub auditor_id: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct InventoryHistoryQueryDto {
    pub item_id: Option<i32>,
}

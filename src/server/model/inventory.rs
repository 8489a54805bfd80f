use std::cmp::Ordering;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::model::inventory::{
    InventoryAuditDto, InventoryItemDto, ProcurementDto, StockLogDto, UsageDto,
};

/// Kinds of stock movement recorded in the stock ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOperation {
    Procure,
    Use,
    Audit,
}

impl StockOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Procure => "procure",
            Self::Use => "use",
            Self::Audit => "audit",
        }
    }
}

/// Outcome of comparing counted stock with the recorded stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditResult {
    Matched,
    Missing,
    Surplus,
}

impl AuditResult {
    pub fn of(expected: i32, actual: i32) -> Self {
        match actual.cmp(&expected) {
            Ordering::Equal => Self::Matched,
            Ordering::Less => Self::Missing,
            Ordering::Greater => Self::Surplus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Matched => "matched",
            Self::Missing => "missing",
            Self::Surplus => "surplus",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateItemParams {
    pub name: String,
    pub category: Option<String>,
    pub unit: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProcurementParams {
    pub item_id: i32,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub supplier: Option<String>,
    pub purchase_date: NaiveDate,
    pub purchaser_id: i32,
}

#[derive(Debug, Clone)]
pub struct UsageParams {
    pub item_id: i32,
    pub quantity: i32,
    pub user_id: i32,
    pub purpose: Option<String>,
    pub operator_id: i32,
}

#[derive(Debug, Clone)]
pub struct AuditParams {
    pub item_id: i32,
    pub expected_stock: i32,
    pub actual_stock: i32,
    pub auditor_id: i32,
    pub notes: Option<String>,
}

/// A stock movement with the stock on both sides of it.
#[derive(Debug, Clone)]
pub struct StockEntry {
    pub item_id: i32,
    pub operation: StockOperation,
    pub stock_before: i32,
    pub stock_after: i32,
    pub operator_id: i32,
    pub related_id: Option<i32>,
}

pub fn item_into_dto(entity: entity::inventory_item::Model) -> InventoryItemDto {
    InventoryItemDto {
        id: entity.id,
        name: entity.name,
        category: entity.category,
        unit: entity.unit,
        description: entity.description,
        current_stock: entity.current_stock,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

pub fn stock_log_into_dto(entity: entity::inventory_stock_log::Model) -> StockLogDto {
    StockLogDto {
        id: entity.id,
        item_id: entity.item_id,
        operation: entity.operation,
        change: entity.change,
        stock_before: entity.stock_before,
        stock_after: entity.stock_after,
        operator_id: entity.operator_id,
        related_id: entity.related_id,
        created_at: entity.created_at,
    }
}

pub fn procurement_into_dto(entity: entity::procurement_record::Model) -> ProcurementDto {
    ProcurementDto {
        id: entity.id,
        item_id: entity.item_id,
        quantity: entity.quantity,
        price_per_unit: entity.price_per_unit,
        total_price: entity.total_price,
        supplier: entity.supplier,
        purchase_date: entity.purchase_date,
        purchaser_id: entity.purchaser_id,
        created_at: entity.created_at,
    }
}

pub fn usage_into_dto(entity: entity::inventory_usage::Model) -> UsageDto {
    UsageDto {
        id: entity.id,
        item_id: entity.item_id,
        quantity: entity.quantity,
        user_id: entity.user_id,
        purpose: entity.purpose,
        operator_id: entity.operator_id,
        created_at: entity.created_at,
    }
}

pub fn audit_into_dto(entity: entity::inventory_audit::Model) -> InventoryAuditDto {
    InventoryAuditDto {
        id: entity.id,
        item_id: entity.item_id,
        expected_stock: entity.expected_stock,
        actual_stock: entity.actual_stock,
        discrepancy: entity.discrepancy,
        result_status: entity.result_status,
        auditor_id: entity.auditor_id,
        notes: entity.notes,
        created_at: entity.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_counts() {
        assert_eq!(AuditResult::of(10, 10), AuditResult::Matched);
        assert_eq!(AuditResult::of(10, 7), AuditResult::Missing);
        assert_eq!(AuditResult::of(0, 2).as_str(), "surplus");
    }
}

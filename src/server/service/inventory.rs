//! Office supply stock: procurement, issuing and stock counts.
//!
//! Every stock change is a conditional update inside a transaction that also writes
//! the movement row and a stock ledger entry with the stock before and after.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        inventory::{
            AuditItemDto, CreateInventoryItemDto, InventoryAuditDto, InventoryItemDto,
            InventoryItemQueryDto, ProcureDto, ProcurementDto, StockChangeDto, StockLogDto,
            UseItemDto, UsageDto,
        },
    },
    server::{
        data::{inventory::InventoryRepository, user::UserRepository},
        error::AppError,
        middleware::auth::{CurrentUser, Permission},
        model::inventory::{
            audit_into_dto, item_into_dto, procurement_into_dto, stock_log_into_dto,
            usage_into_dto, AuditParams, CreateItemParams, ProcurementParams, StockEntry,
            StockOperation, UsageParams,
        },
        util::validate::{optional_text, required_text},
    },
};

const NAME_MAX_CHARS: usize = 100;
const SHORT_MAX_CHARS: usize = 50;
const NOTE_MAX_CHARS: usize = 500;
const PRICE_MAX_SCALE: u32 = 2;

pub struct InventoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InventoryService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_items(
        &self,
        query: InventoryItemQueryDto,
    ) -> Result<Vec<InventoryItemDto>, AppError> {
        let keyword = query.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty());
        let category = query.category.as_deref().filter(|c| !c.is_empty());

        let items = InventoryRepository::new(self.db)
            .list_items(keyword, category)
            .await?;
        Ok(items.into_iter().map(item_into_dto).collect())
    }

    /// Registers an item with zero stock.
    pub async fn create_item(
        &self,
        current: &CurrentUser,
        dto: CreateInventoryItemDto,
    ) -> Result<InventoryItemDto, AppError> {
        current.require(Permission::InventoryManage)?;
        let item = InventoryRepository::new(self.db)
            .create_item(item_params(dto)?)
            .await?;

        tracing::info!(item_id = item.id, name = %item.name, "inventory item created");
        Ok(item_into_dto(item))
    }

    /// Records a purchase and adds it to stock.
    ///
    /// `today` stands in for a missing purchase date.
    pub async fn procure(
        &self,
        current: &CurrentUser,
        dto: ProcureDto,
        today: NaiveDate,
    ) -> Result<StockChangeDto, AppError> {
        current.require(Permission::InventoryManage)?;
        if dto.quantity <= 0 {
            return Err(AppError::bad_request("quantity must be positive"));
        }
        if dto.price_per_unit < Decimal::ZERO {
            return Err(AppError::bad_request("price_per_unit must not be negative"));
        }
        if dto.price_per_unit.normalize().scale() > PRICE_MAX_SCALE {
            return Err(AppError::bad_request(
                "price_per_unit has at most two decimal places",
            ));
        }
        let supplier = optional_text("supplier", dto.supplier, NAME_MAX_CHARS)?;
        let new_item = match (dto.item_id, dto.new_item) {
            (Some(_), None) => None,
            (None, Some(new_item)) => Some(item_params(new_item)?),
            _ => return Err(AppError::bad_request("Give either item_id or new_item")),
        };

        let txn = self.db.begin().await?;
        let repo = InventoryRepository::new(&txn);
        let item_id = match new_item {
            Some(params) => repo.create_item(params).await?.id,
            None => dto.item_id.ok_or_else(item_not_found)?,
        };
        let item = repo
            .add_stock(item_id, dto.quantity)
            .await?
            .ok_or_else(item_not_found)?;
        let procurement = repo
            .record_procurement(ProcurementParams {
                item_id,
                quantity: dto.quantity,
                price_per_unit: dto.price_per_unit,
                supplier,
                purchase_date: dto.purchase_date.unwrap_or(today),
                purchaser_id: current.id(),
            })
            .await?;
        let log = repo
            .log_stock(StockEntry {
                item_id,
                operation: StockOperation::Procure,
                stock_before: item.current_stock - dto.quantity,
                stock_after: item.current_stock,
                operator_id: current.id(),
                related_id: Some(procurement.id),
            })
            .await?;
        txn.commit().await?;

        tracing::info!(
            item_id,
            quantity = dto.quantity,
            total = %procurement.total_price,
            "procured"
        );
        Ok(StockChangeDto {
            item: item_into_dto(item),
            log: stock_log_into_dto(log),
        })
    }

    /// Issues items from stock to the caller or, for managers, to another user.
    pub async fn use_items(
        &self,
        current: &CurrentUser,
        dto: UseItemDto,
    ) -> Result<StockChangeDto, AppError> {
        if dto.quantity <= 0 {
            return Err(AppError::bad_request("quantity must be positive"));
        }
        let purpose = optional_text("purpose", dto.purpose, NOTE_MAX_CHARS)?;
        let recipient = match dto.user_id {
            Some(id) if id != current.id() => {
                current.require(Permission::InventoryManage)?;
                UserRepository::new(self.db)
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::bad_request(format!("User {} does not exist", id)))?
                    .id
            }
            _ => current.id(),
        };

        let txn = self.db.begin().await?;
        let repo = InventoryRepository::new(&txn);
        let before = repo
            .find_item(dto.item_id)
            .await?
            .ok_or_else(item_not_found)?;
        let item = repo
            .add_stock(dto.item_id, -dto.quantity)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "Insufficient stock for {}: {} requested",
                    before.name, dto.quantity
                ))
            })?;
        let usage = repo
            .record_usage(UsageParams {
                item_id: item.id,
                quantity: dto.quantity,
                user_id: recipient,
                purpose,
                operator_id: current.id(),
            })
            .await?;
        let log = repo
            .log_stock(StockEntry {
                item_id: item.id,
                operation: StockOperation::Use,
                stock_before: item.current_stock + dto.quantity,
                stock_after: item.current_stock,
                operator_id: current.id(),
                related_id: Some(usage.id),
            })
            .await?;
        txn.commit().await?;

        tracing::info!(item_id = item.id, quantity = dto.quantity, recipient, "items issued");
        Ok(StockChangeDto {
            item: item_into_dto(item),
            log: stock_log_into_dto(log),
        })
    }

    /// Records a stock count and sets the stock to the counted value.
    pub async fn audit(
        &self,
        current: &CurrentUser,
        dto: AuditItemDto,
    ) -> Result<(InventoryAuditDto, StockChangeDto), AppError> {
        current.require(Permission::InventoryManage)?;
        if dto.actual_stock < 0 {
            return Err(AppError::bad_request("actual_stock must not be negative"));
        }
        let notes = optional_text("notes", dto.notes, NOTE_MAX_CHARS)?;

        let txn = self.db.begin().await?;
        let repo = InventoryRepository::new(&txn);
        let before = repo
            .find_item(dto.item_id)
            .await?
            .ok_or_else(item_not_found)?;
        let item = repo
            .set_stock(before.id, before.current_stock, dto.actual_stock)
            .await?
            .ok_or_else(|| AppError::bad_request("Stock changed during the count, count again"))?;
        let audit = repo
            .record_audit(AuditParams {
                item_id: item.id,
                expected_stock: before.current_stock,
                actual_stock: dto.actual_stock,
                auditor_id: current.id(),
                notes,
            })
            .await?;
        let log = repo
            .log_stock(StockEntry {
                item_id: item.id,
                operation: StockOperation::Audit,
                stock_before: before.current_stock,
                stock_after: item.current_stock,
                operator_id: current.id(),
                related_id: Some(audit.id),
            })
            .await?;
        txn.commit().await?;

        tracing::info!(
            item_id = item.id,
            discrepancy = audit.discrepancy,
            result = %audit.result_status,
            "stock counted"
        );
        Ok((
            audit_into_dto(audit),
            StockChangeDto {
                item: item_into_dto(item),
                log: stock_log_into_dto(log),
            },
        ))
    }

    pub async fn procurements(
        &self,
        current: &CurrentUser,
        item_id: Option<i32>,
        pagination: PaginationParams,
    ) -> Result<PageDto<ProcurementDto>, AppError> {
        current.require(Permission::InventoryManage)?;
        let per_page = pagination.per_page();
        let (rows, total) = InventoryRepository::new(self.db)
            .procurements(item_id, pagination.page, per_page)
            .await?;
        Ok(PageDto::new(
            rows.into_iter().map(procurement_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn usages(
        &self,
        current: &CurrentUser,
        item_id: Option<i32>,
        pagination: PaginationParams,
    ) -> Result<PageDto<UsageDto>, AppError> {
        current.require(Permission::InventoryManage)?;
        let per_page = pagination.per_page();
        let (rows, total) = InventoryRepository::new(self.db)
            .usages(item_id, pagination.page, per_page)
            .await?;
        Ok(PageDto::new(
            rows.into_iter().map(usage_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn audits(
        &self,
        current: &CurrentUser,
        item_id: Option<i32>,
        pagination: PaginationParams,
    ) -> Result<PageDto<InventoryAuditDto>, AppError> {
        current.require(Permission::InventoryManage)?;
        let per_page = pagination.per_page();
        let (rows, total) = InventoryRepository::new(self.db)
            .audits(item_id, pagination.page, per_page)
            .await?;
        Ok(PageDto::new(
            rows.into_iter().map(audit_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn stock_logs(
        &self,
        current: &CurrentUser,
        item_id: Option<i32>,
        pagination: PaginationParams,
    ) -> Result<PageDto<StockLogDto>, AppError> {
        current.require(Permission::InventoryManage)?;
        let per_page = pagination.per_page();
        let (rows, total) = InventoryRepository::new(self.db)
            .stock_logs(item_id, pagination.page, per_page)
            .await?;
        Ok(PageDto::new(
            rows.into_iter().map(stock_log_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }
}

fn item_params(dto: CreateInventoryItemDto) -> Result<CreateItemParams, AppError> {
    Ok(CreateItemParams {
        name: required_text("name", &dto.name, NAME_MAX_CHARS)?,
        category: optional_text("category", dto.category, SHORT_MAX_CHARS)?,
        unit: optional_text("unit", dto.unit, SHORT_MAX_CHARS)?,
        description: optional_text("description", dto.description, NOTE_MAX_CHARS)?,
    })
}

fn item_not_found() -> AppError {
    AppError::not_found("Inventory item not found")
}

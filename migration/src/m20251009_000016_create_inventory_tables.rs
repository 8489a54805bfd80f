use sea_orm_migration::{prelude::*, schema::*};

use super::{
    m20251001_000002_create_user_table::User, m20251001_000004_create_role_tables::Permission,
};

const PERMISSIONS: &[(&str, &str, &str)] = &[(
    "inventory:manage",
    "Manage office supplies and stock",
    "finance",
)];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(InventoryItem::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryItem::Id))
                    .col(string(InventoryItem::Name))
                    .col(string_null(InventoryItem::Category))
                    .col(string_null(InventoryItem::Unit))
                    .col(text_null(InventoryItem::Description))
                    .col(integer(InventoryItem::CurrentStock).default(0))
                    .col(
                        timestamp_with_time_zone(InventoryItem::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(InventoryItem::UpdatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProcurementRecord::Table)
                    .if_not_exists()
                    .col(pk_auto(ProcurementRecord::Id))
                    .col(integer(ProcurementRecord::ItemId))
                    .col(integer(ProcurementRecord::Quantity))
                    .col(decimal_len(ProcurementRecord::PricePerUnit, 12, 2))
                    .col(decimal_len(ProcurementRecord::TotalPrice, 14, 2))
                    .col(string_null(ProcurementRecord::Supplier))
                    .col(date(ProcurementRecord::PurchaseDate))
                    .col(integer(ProcurementRecord::PurchaserId))
                    .col(
                        timestamp_with_time_zone(ProcurementRecord::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_procurement_record_item_id")
                            .from(ProcurementRecord::Table, ProcurementRecord::ItemId)
                            .to(InventoryItem::Table, InventoryItem::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_procurement_record_purchaser_id")
                            .from(ProcurementRecord::Table, ProcurementRecord::PurchaserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryUsage::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryUsage::Id))
                    .col(integer(InventoryUsage::ItemId))
                    .col(integer(InventoryUsage::Quantity))
                    .col(integer(InventoryUsage::UserId))
                    .col(text_null(InventoryUsage::Purpose))
                    .col(integer(InventoryUsage::OperatorId))
                    .col(
                        timestamp_with_time_zone(InventoryUsage::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_usage_item_id")
                            .from(InventoryUsage::Table, InventoryUsage::ItemId)
                            .to(InventoryItem::Table, InventoryItem::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_usage_user_id")
                            .from(InventoryUsage::Table, InventoryUsage::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryAudit::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryAudit::Id))
                    .col(integer(InventoryAudit::ItemId))
                    .col(integer(InventoryAudit::ExpectedStock))
                    .col(integer(InventoryAudit::ActualStock))
                    .col(integer(InventoryAudit::Discrepancy))
                    .col(string(InventoryAudit::ResultStatus))
                    .col(integer(InventoryAudit::AuditorId))
                    .col(text_null(InventoryAudit::Notes))
                    .col(
                        timestamp_with_time_zone(InventoryAudit::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_audit_item_id")
                            .from(InventoryAudit::Table, InventoryAudit::ItemId)
                            .to(InventoryItem::Table, InventoryItem::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InventoryStockLog::Table)
                    .if_not_exists()
                    .col(pk_auto(InventoryStockLog::Id))
                    .col(integer(InventoryStockLog::ItemId))
                    .col(string(InventoryStockLog::Operation))
                    .col(integer(InventoryStockLog::Change))
                    .col(integer(InventoryStockLog::StockBefore))
                    .col(integer(InventoryStockLog::StockAfter))
                    .col(integer(InventoryStockLog::OperatorId))
                    .col(integer_null(InventoryStockLog::RelatedId))
                    .col(
                        timestamp_with_time_zone(InventoryStockLog::CreatedAt)
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_inventory_stock_log_item_id")
                            .from(InventoryStockLog::Table, InventoryStockLog::ItemId)
                            .to(InventoryItem::Table, InventoryItem::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(Permission::Table)
            .columns([Permission::Code, Permission::Name, Permission::Module]);
        for (code, name, module) in PERMISSIONS {
            seed.values([(*code).into(), (*name).into(), (*module).into()])
                .map_err(|e| DbErr::Custom(e.to_string()))?;
        }

        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(
                Query::delete()
                    .from_table(Permission::Table)
                    .and_where(
                        Expr::col(Permission::Code)
                            .is_in(PERMISSIONS.iter().map(|(code, _, _)| *code)),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryStockLog::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryAudit::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryUsage::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProcurementRecord::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(InventoryItem::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum InventoryItem {
    Table,
    Id,
    Name,
    Category,
    Unit,
    Description,
    CurrentStock,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ProcurementRecord {
    Table,
    Id,
    ItemId,
    Quantity,
    PricePerUnit,
    TotalPrice,
    Supplier,
    PurchaseDate,
    PurchaserId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum InventoryUsage {
    Table,
    Id,
    ItemId,
    Quantity,
    UserId,
    Purpose,
    OperatorId,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum InventoryAudit {
    Table,
    Id,
    ItemId,
    ExpectedStock,
    ActualStock,
    Discrepancy,
    ResultStatus,
    AuditorId,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum InventoryStockLog {
    Table,
    Id,
    ItemId,
    Operation,
    Change,
    StockBefore,
    StockAfter,
    OperatorId,
    RelatedId,
    CreatedAt,
}

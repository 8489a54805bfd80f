//! Supply item factory.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating stocked supply items.
pub struct InventoryItemFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    category: Option<String>,
    current_stock: i32,
}

impl<'a> InventoryItemFactory<'a> {
    /// Creates a new InventoryItemFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Item {id}"`
    /// - category: `"stationery"`
    /// - current_stock: `0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("Item {}", next_id()),
            category: Some("stationery".to_string()),
            current_stock: 0,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn category(mut self, category: Option<&str>) -> Self {
        self.category = category.map(str::to_string);
        self
    }

    /// Starting stock, written directly without a ledger entry.
    pub fn stock(mut self, current_stock: i32) -> Self {
        self.current_stock = current_stock;
        self
    }

    pub async fn build(self) -> Result<entity::inventory_item::Model, DbErr> {
        let now = Utc::now();
        entity::inventory_item::ActiveModel {
            name: ActiveValue::Set(self.name),
            category: ActiveValue::Set(self.category),
            unit: ActiveValue::Set(Some("pcs".to_string())),
            description: ActiveValue::Set(None),
            current_stock: ActiveValue::Set(self.current_stock),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a stationery item with the given stock.
pub async fn create_inventory_item(
    db: &DatabaseConnection,
    current_stock: i32,
) -> Result<entity::inventory_item::Model, DbErr> {
    InventoryItemFactory::new(db).stock(current_stock).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_item_with_stock() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_inventory_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let item = create_inventory_item(db, 7).await?;
        let other = InventoryItemFactory::new(db).category(None).build().await?;

        assert_eq!(item.current_stock, 7);
        assert_ne!(item.name, other.name);
        assert!(other.category.is_none());

        Ok(())
    }
}

//! `SeaORM` Entity for purchases that add stock.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "procurement_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub price_per_unit: Decimal,
    pub total_price: Decimal,
    pub supplier: Option<String>,
    pub purchase_date: Date,
    pub purchaser_id: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

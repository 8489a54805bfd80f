//! `SeaORM` Entity for the stock ledger: one row per stock change.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "inventory_stock_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    /// `procure`, `use` or `audit`.
    pub operation: String,
    pub change: i32,
    pub stock_before: i32,
    pub stock_after: i32,
    pub operator_id: i32,
    /// Id of the procurement, usage or audit row behind the change.
    pub related_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

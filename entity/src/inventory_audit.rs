//! `SeaORM` Entity for stocktaking results.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "inventory_audit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub item_id: i32,
    pub expected_stock: i32,
    pub actual_stock: i32,
    pub discrepancy: i32,
    /// `matched`, `missing` or `surplus`.
    pub result_status: String,
    pub auditor_id: i32,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

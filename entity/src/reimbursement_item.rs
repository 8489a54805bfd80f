//! `SeaORM` Entity for a single expense line of a reimbursement claim.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reimbursement_item")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reimbursement_id: i32,
    pub item_type: String,
    pub amount: Decimal,
    pub expense_date: Option<Date>,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

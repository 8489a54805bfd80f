//! `SeaORM` Entity for the status history of a reimbursement claim.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reimbursement_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reimbursement_id: i32,
    /// `create`, `update`, `submit`, `cancel`, `approve` or `reject`.
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub operator_id: i32,
    pub opinion: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

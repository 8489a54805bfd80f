//! `SeaORM` Entity for expense reimbursement claims.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "reimbursement")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Assigned inside the creating transaction once the id is known.
    #[sea_orm(unique)]
    pub reimbursement_no: Option<String>,
    pub employee_id: i32,
    pub user_id: i32,
    pub department_id: Option<i32>,
    pub title: String,
    pub kind: String,
    pub total_amount: Decimal,
    pub remark: Option<String>,
    /// `draft`, `pending`, `approved`, `rejected` or `cancelled`.
    pub status: String,
    pub submitted_at: Option<DateTimeUtc>,
    pub approver_id: Option<i32>,
    pub decided_at: Option<DateTimeUtc>,
    pub opinion: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

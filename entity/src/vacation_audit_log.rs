//! `SeaORM` Entity for the vacation balance audit trail.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "vacation_audit_log")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub balance_id: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    pub operation: String,
    pub change_days: f64,
    pub before_snapshot: Option<Json>,
    pub after_snapshot: Option<Json>,
    pub reason: Option<String>,
    pub operator_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

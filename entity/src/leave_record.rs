//! `SeaORM` Entity for leave requests.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leave_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub vacation_type_id: i32,
    pub start_date: Date,
    pub end_date: Date,
    pub days: f64,
    pub reason: Option<String>,
    pub status: String,
    pub approver_id: Option<i32>,
    pub approved_at: Option<DateTimeUtc>,
    pub approval_note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

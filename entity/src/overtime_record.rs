//! `SeaORM` Entity for overtime requests.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "overtime_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub overtime_date: Date,
    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,
    pub hours: f64,
    pub reason: String,
    pub status: String,
    pub approver_id: Option<i32>,
    pub approved_at: Option<DateTimeUtc>,
    pub approval_note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

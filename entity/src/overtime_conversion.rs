//! `SeaORM` Entity recording each overtime-to-leave conversion.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "overtime_conversion")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub year: i32,
    pub overtime_hours: f64,
    pub vacation_type_id: i32,
    pub converted_days: f64,
    pub conversion_rule_id: Option<i32>,
    pub conversion_ratio: f64,
    pub created_by: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

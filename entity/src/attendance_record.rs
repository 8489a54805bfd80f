//! `SeaORM` Entity for daily clock-in/clock-out records.
//!
//! One row per employee and office-local date.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_record")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub record_date: Date,
    pub clock_in_time: Option<DateTimeUtc>,
    pub clock_out_time: Option<DateTimeUtc>,
    pub work_hours: Option<f64>,
    /// `normal`, `late` or `early`.
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity assigning a shift (or rest day) to an employee on a date.
//!
//! (`employee_id`, `schedule_date`) is unique.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shift_schedule")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub schedule_date: Date,
    pub shift_id: i32,
    pub is_rest_day: bool,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::work_shift::Entity",
        from = "Column::ShiftId",
        to = "super::work_shift::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    WorkShift,
}

impl Related<super::work_shift::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkShift.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

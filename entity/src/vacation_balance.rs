//! `SeaORM` Entity for per-employee, per-year, per-type vacation balances.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vacation_balance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub employee_id: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    pub total_days: f64,
    pub converted_days: f64,
    pub adjusted_days: f64,
    pub used_days: f64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vacation_type::Entity",
        from = "Column::VacationTypeId",
        to = "super::vacation_type::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    VacationType,
}

impl Related<super::vacation_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VacationType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for statutory entitlement entries.
//!
//! The sum of `days` for a year and vacation type is the statutory total of every
//! balance of that type and year.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "holiday")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub days: i32,
    pub month: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    pub created_at: DateTimeUtc,
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

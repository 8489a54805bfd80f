//! `SeaORM` Entity for memo delivery and read state.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "memo_recipient")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub memo_id: i32,
    pub user_id: i32,
    pub is_read: bool,
    pub read_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

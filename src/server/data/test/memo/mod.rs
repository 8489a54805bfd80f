use crate::server::{
    data::memo::MemoRepository,
    model::memo::{memo_type, CreateMemoParams},
};
use sea_orm::DbErr;
use test_utils::{builder::TestBuilder, factory};

mod create;
mod read_state;

fn department_memo(created_by: i32) -> CreateMemoParams {
    CreateMemoParams {
        title: "Fire drill".to_string(),
        content: "Thursday 10:00".to_string(),
        memo_type: memo_type::DEPARTMENT,
        priority: "high".to_string(),
        created_by,
    }
}

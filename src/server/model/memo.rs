use std::collections::HashMap;

use crate::model::memo::{MemoDto, SentMemoDto};

pub mod memo_type {
    pub const PERSONAL: &str = "personal";
    pub const DEPARTMENT: &str = "department";
}

pub const PRIORITIES: [&str; 3] = ["low", "normal", "high"];

#[derive(Debug, Clone)]
pub struct CreateMemoParams {
    pub title: String,
    pub content: String,
    pub memo_type: &'static str,
    pub priority: String,
    pub created_by: i32,
}

pub fn memo_into_dto(
    memo: entity::memo::Model,
    recipient: &entity::memo_recipient::Model,
    names: &HashMap<i32, String>,
) -> MemoDto {
    MemoDto {
        id: memo.id,
        creator_name: names.get(&memo.created_by).cloned(),
        title: memo.title,
        content: memo.content,
        memo_type: memo.memo_type,
        priority: memo.priority,
        created_by: memo.created_by,
        is_read: recipient.is_read,
        read_at: recipient.read_at,
        created_at: memo.created_at,
        updated_at: memo.updated_at,
    }
}

pub fn sent_memo_into_dto(memo: entity::memo::Model, recipient_count: u64, read_count: u64) -> SentMemoDto {
    SentMemoDto {
        id: memo.id,
        title: memo.title,
        content: memo.content,
        priority: memo.priority,
        created_at: memo.created_at,
        recipient_count,
        read_count,
    }
}

use std::collections::HashMap;

use crate::model::chat::ChatMessageDto;

pub const MAX_MESSAGE_LENGTH: usize = 2000;
pub const DEFAULT_HISTORY_LIMIT: u64 = 50;
pub const MAX_HISTORY_LIMIT: u64 = 100;

pub mod member_role {
    pub const ADMIN: &str = "admin";
    pub const MEMBER: &str = "member";
}

pub fn message_into_dto(
    entity: entity::chat_message::Model,
    names: &HashMap<i32, String>,
) -> ChatMessageDto {
    ChatMessageDto {
        id: entity.id,
        group_id: entity.group_id,
        sender_id: entity.sender_id,
        sender_name: names.get(&entity.sender_id).cloned(),
        content: entity.content,
        created_at: entity.created_at,
    }
}

pub fn history_limit(requested: Option<u64>) -> u64 {
    requested
        .unwrap_or(DEFAULT_HISTORY_LIMIT)
        .clamp(1, MAX_HISTORY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::history_limit;

    #[test]
    fn limit_is_clamped() {
        assert_eq!(history_limit(None), 50);
        assert_eq!(history_limit(Some(0)), 1);
        assert_eq!(history_limit(Some(500)), 100);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateChatGroupDto {
    pub name: String,
    pub department_id: Option<i32>,
    #[serde(default)]
    pub member_ids: Vec<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ChatGroupDto {
    pub id: i32,
    pub name: String,
    pub department_id: Option<i32>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub member_count: u64,
    pub unread_count: u64,
    pub is_muted: bool,
    pub last_message: Option<ChatMessageDto>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ChatMemberDto {
    pub user_id: i32,
    pub real_name: Option<String>,
    /// `admin` or `member`.
    pub role: String,
    pub is_muted: bool,
    pub joined_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct AddChatMembersDto {
    pub user_ids: Vec<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ChatMessageDto {
    pub id: i32,
    pub group_id: i32,
    pub sender_id: i32,
    pub sender_name: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct SendChatMessageDto {
    pub content: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct MuteChatGroupDto {
    pub muted: bool,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ChatHistoryQueryDto {
    /// Only messages with a smaller id are returned.
    pub before_id: Option<i32>,
    /// Page size, at most 100 (default 50).
    pub limit: Option<u64>,
}

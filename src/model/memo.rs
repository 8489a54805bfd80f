use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreatePersonalMemoDto {
    pub title: String,
    pub content: String,
    pub priority: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdatePersonalMemoDto {
    pub title: Option<String>,
    pub content: Option<String>,
    pub priority: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateDepartmentMemoDto {
    pub title: String,
    pub content: String,
    pub priority: Option<String>,
    pub department_ids: Vec<i32>,
}

/// A memo from the recipient's point of view.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct MemoDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    /// `personal` or `department`.
    pub memo_type: String,
    pub priority: String,
    pub created_by: i32,
    pub creator_name: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A department memo from the author's point of view.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct SentMemoDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub created_at: DateTime<Utc>,
    pub recipient_count: u64,
    pub read_count: u64,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct MemoFilterDto {
    pub memo_type: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct MemoRecipientDto {
    pub user_id: i32,
    pub real_name: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

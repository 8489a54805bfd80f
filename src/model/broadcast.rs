use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateBroadcastDto {
    pub title: String,
    pub content: String,
    /// `low`, `normal` (default), `high` or `urgent`.
    pub priority: Option<String>,
    /// `all`, `department`, `role` or `individual`.
    pub target_type: String,
    /// Department, role or user ids depending on `target_type`; ignored for `all`.
    #[serde(default)]
    pub target_ids: Vec<i32>,
    pub expires_at: Option<DateTime<Utc>>,
}

/// A broadcast as seen by its sender, with read statistics.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct BroadcastDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub target_type: String,
    pub target_ids: Vec<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: i32,
    pub created_at: DateTime<Utc>,
    pub recipient_count: u64,
    pub read_count: u64,
}

/// A broadcast as seen by a recipient.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ReceivedBroadcastDto {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub priority: String,
    pub sender_id: i32,
    pub sender_name: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct RecipientDto {
    pub user_id: i32,
    pub real_name: Option<String>,
    pub department_id: Option<i32>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ReceivedBroadcastFilterDto {
    pub is_read: Option<bool>,
}

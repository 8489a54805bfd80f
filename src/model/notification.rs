use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct NotificationDto {
    pub id: i32,
    pub user_id: i32,
    /// e.g. `leave_approval`, `overtime_approval`, `exam_notification`.
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub content: String,
    pub related_type: Option<String>,
    pub related_id: Option<i32>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct NotificationFilterDto {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct NotificationTypeCountDto {
    #[serde(rename = "type")]
    pub kind: String,
    pub total: u64,
    pub unread: u64,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct NotificationStatsDto {
    pub total: u64,
    pub unread: u64,
    pub by_type: Vec<NotificationTypeCountDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CleanupNotificationsDto {
    /// Read notifications older than this many days are deleted.
    pub days: i64,
}

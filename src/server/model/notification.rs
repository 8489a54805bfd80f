use chrono::{DateTime, Utc};

use crate::model::notification::NotificationDto;

/// Notification categories emitted by the server.
pub mod kind {
    pub const LEAVE_APPROVAL: &str = "leave_approval";
    pub const OVERTIME_APPROVAL: &str = "overtime_approval";
    pub const EXAM_NOTIFICATION: &str = "exam_notification";
    pub const ATTENDANCE_ABNORMAL: &str = "attendance_abnormal";
    pub const REIMBURSEMENT_APPROVAL: &str = "reimbursement_approval";
}

#[derive(Debug, Clone)]
pub struct CreateNotificationParams {
    pub user_id: i32,
    pub kind: String,
    pub title: String,
    pub content: String,
    pub related_type: Option<String>,
    pub related_id: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct NotificationFilter {
    pub unread_only: bool,
    pub kind: Option<String>,
}

pub fn notification_into_dto(entity: entity::notification::Model) -> NotificationDto {
    NotificationDto {
        id: entity.id,
        user_id: entity.user_id,
        kind: entity.kind,
        title: entity.title,
        content: entity.content,
        related_type: entity.related_type,
        related_id: entity.related_id,
        is_read: entity.is_read,
        read_at: entity.read_at,
        created_at: entity.created_at,
    }
}

/// Read notifications created before this instant are eligible for cleanup.
pub fn retention_cutoff(now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    now - chrono::Duration::days(days.max(0))
}

use crate::server::{
    data::notification::NotificationRepository,
    model::notification::{kind, CreateNotificationParams, NotificationFilter},
};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};
use test_utils::{builder::TestBuilder, factory};

mod cleanup;
mod get_paginated;
mod mark_read;

async fn notify(
    db: &DatabaseConnection,
    user_id: i32,
    notification_kind: &str,
) -> Result<entity::notification::Model, DbErr> {
    NotificationRepository::new(db)
        .create(CreateNotificationParams {
            user_id,
            kind: notification_kind.to_string(),
            title: "Title".to_string(),
            content: "Content".to_string(),
            related_type: None,
            related_id: None,
        })
        .await
}

use chrono::{DateTime, Utc};
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        notification::{
            NotificationDto, NotificationFilterDto, NotificationStatsDto, NotificationTypeCountDto,
        },
    },
    server::{
        data::notification::NotificationRepository,
        error::AppError,
        model::notification::{
            notification_into_dto, retention_cutoff, CreateNotificationParams, NotificationFilter,
        },
    },
};

/// Stores a notification and returns it ready to be pushed.
pub async fn notify<C: ConnectionTrait>(
    db: &C,
    params: CreateNotificationParams,
) -> Result<NotificationDto, AppError> {
    let notification = NotificationRepository::new(db).create(params).await?;
    Ok(notification_into_dto(notification))
}

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        user_id: i32,
        filter: NotificationFilterDto,
        pagination: PaginationParams,
    ) -> Result<PageDto<NotificationDto>, AppError> {
        let filter = NotificationFilter {
            unread_only: filter.unread_only,
            kind: filter.kind.filter(|k| !k.is_empty()),
        };
        let per_page = pagination.per_page();

        let (notifications, total) = NotificationRepository::new(self.db)
            .get_paginated(user_id, &filter, pagination.page, per_page)
            .await?;

        Ok(PageDto::new(
            notifications.into_iter().map(notification_into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn unread_count(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(NotificationRepository::new(self.db)
            .unread_count(user_id)
            .await?)
    }

    /// Marks one of the user's notifications read; 404 when it is not theirs.
    pub async fn mark_read(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        if NotificationRepository::new(self.db)
            .mark_read(user_id, id)
            .await?
            == 0
        {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    pub async fn mark_all_read(&self, user_id: i32) -> Result<u64, AppError> {
        Ok(NotificationRepository::new(self.db)
            .mark_all_read(user_id)
            .await?)
    }

    pub async fn delete(&self, user_id: i32, id: i32) -> Result<(), AppError> {
        if NotificationRepository::new(self.db).delete(user_id, id).await? == 0 {
            return Err(AppError::not_found("Notification not found"));
        }
        Ok(())
    }

    pub async fn stats(&self, user_id: i32) -> Result<NotificationStatsDto, AppError> {
        let counts = NotificationRepository::new(self.db)
            .counts_by_kind(user_id)
            .await?;

        let by_type: Vec<NotificationTypeCountDto> = counts
            .into_iter()
            .map(|(kind, total, unread)| NotificationTypeCountDto {
                kind,
                total: total.max(0) as u64,
                unread: unread.max(0) as u64,
            })
            .collect();

        Ok(NotificationStatsDto {
            total: by_type.iter().map(|c| c.total).sum(),
            unread: by_type.iter().map(|c| c.unread).sum(),
            by_type,
        })
    }

    /// Deletes read notifications older than `days`, returning how many were removed.
    pub async fn cleanup(&self, days: i64, now: DateTime<Utc>) -> Result<u64, AppError> {
        if days < 1 {
            return Err(AppError::bad_request("days must be at least 1"));
        }

        let deleted = NotificationRepository::new(self.db)
            .delete_read_before(retention_cutoff(now, days))
            .await?;

        tracing::info!("Deleted {} read notifications older than {} days", deleted, days);

        Ok(deleted)
    }
}

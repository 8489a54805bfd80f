use chrono::Utc;
use sea_orm::DatabaseConnection;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::server::{error::AppError, service::notification::NotificationService};

/// Every day at 03:00.
const CLEANUP_SCHEDULE: &str = "0 0 3 * * *";

/// Starts the daily cleanup of read notifications older than `retention_days`.
pub async fn start_scheduler(db: DatabaseConnection, retention_days: i64) -> Result<(), AppError> {
    let scheduler = JobScheduler::new().await?;

    let job = Job::new_async(CLEANUP_SCHEDULE, move |_uuid, _lock| {
        let db = db.clone();

        Box::pin(async move {
            match NotificationService::new(&db)
                .cleanup(retention_days, Utc::now())
                .await
            {
                Ok(removed) => tracing::info!("Removed {} read notifications", removed),
                Err(e) => tracing::error!("Error cleaning up notifications: {}", e),
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;

    tracing::info!("Notification cleanup scheduler started");

    Ok(())
}

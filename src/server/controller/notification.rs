use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, CountDto, ErrorDto, MessageDto, PageDto, PaginationParams},
        notification::{
            CleanupNotificationsDto, NotificationDto, NotificationFilterDto, NotificationStatsDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::notification::NotificationService,
        state::AppState,
    },
};

/// Tag for grouping notification endpoints in OpenAPI documentation
pub static NOTIFICATION_TAG: &str = "notification";

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = NOTIFICATION_TAG,
    params(NotificationFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of the caller's notifications", body = ApiResponse<PageDto<NotificationDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<NotificationFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = NotificationService::new(&state.db)
        .list(current.id(), filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Unread notifications", body = ApiResponse<CountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let count = NotificationService::new(&state.db)
        .unread_count(current.id())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    tag = NOTIFICATION_TAG,
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Marked read", body = MessageDto),
        (status = 404, description = "Not one of the caller's notifications", body = ErrorDto)
    ),
)]
pub async fn mark_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    NotificationService::new(&state.db)
        .mark_read(current.id(), id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Notification marked as read"))))
}

#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Number of notifications marked read", body = ApiResponse<CountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn mark_all_read(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let count = NotificationService::new(&state.db)
        .mark_all_read(current.id())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    tag = NOTIFICATION_TAG,
    params(("id" = i32, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageDto),
        (status = 404, description = "Not one of the caller's notifications", body = ErrorDto)
    ),
)]
pub async fn delete_notification(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    NotificationService::new(&state.db)
        .delete(current.id(), id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Notification deleted"))))
}

#[utoipa::path(
    get,
    path = "/api/notifications/stats",
    tag = NOTIFICATION_TAG,
    responses(
        (status = 200, description = "Totals per type", body = ApiResponse<NotificationStatsDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn notification_stats(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let stats = NotificationService::new(&state.db)
        .stats(current.id())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(stats))))
}

/// Delete read notifications of every user older than `days`.
#[utoipa::path(
    post,
    path = "/api/notifications/cleanup",
    tag = NOTIFICATION_TAG,
    request_body = CleanupNotificationsDto,
    responses(
        (status = 200, description = "Number of deleted notifications", body = ApiResponse<CountDto>),
        (status = 400, description = "days must be at least 1", body = ErrorDto),
        (status = 403, description = "Missing system:manage", body = ErrorDto)
    ),
)]
pub async fn cleanup_notifications(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CleanupNotificationsDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::SystemManage])
        .await?;

    let count = NotificationService::new(&state.db)
        .cleanup(payload.days, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

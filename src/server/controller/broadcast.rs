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
        api::{ApiResponse, ErrorDto, MessageDto, PageDto, PaginationParams},
        broadcast::{
            BroadcastDto, CreateBroadcastDto, ReceivedBroadcastDto, ReceivedBroadcastFilterDto,
            RecipientDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        push::PushEvent,
        service::broadcast::BroadcastService,
        state::AppState,
    },
};

/// Tag for grouping broadcast endpoints in OpenAPI documentation
pub static BROADCAST_TAG: &str = "broadcast";

/// Send a broadcast to everyone, departments, roles or individual users.
///
/// Recipients are resolved at send time and receive the broadcast over WebSocket.
/// Senders without super-admin rights may only target viewable departments.
///
/// # Returns
/// - `201 Created` - The broadcast with its recipient count
/// - `400 Bad Request` - Invalid data, unknown targets or no recipients
/// - `403 Forbidden` - Missing `broadcast:send` or department outside scope
#[utoipa::path(
    post,
    path = "/api/broadcasts",
    tag = BROADCAST_TAG,
    request_body = CreateBroadcastDto,
    responses(
        (status = 201, description = "Broadcast sent", body = ApiResponse<BroadcastDto>),
        (status = 400, description = "Invalid broadcast", body = ErrorDto),
        (status = 403, description = "Missing broadcast:send or target out of scope", body = ErrorDto)
    ),
)]
pub async fn create_broadcast(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateBroadcastDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::BroadcastSend])
        .await?;

    let sent = BroadcastService::new(&state.db)
        .create(&current, payload)
        .await?;
    state.push.send_to_users(
        sent.recipient_ids,
        PushEvent::Broadcast {
            data: sent.received,
        },
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sent.broadcast))))
}

/// Broadcasts sent by the caller (every broadcast for super admins) with read stats.
#[utoipa::path(
    get,
    path = "/api/broadcasts",
    tag = BROADCAST_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of sent broadcasts", body = ApiResponse<PageDto<BroadcastDto>>),
        (status = 403, description = "Missing broadcast:send", body = ErrorDto)
    ),
)]
pub async fn sent_broadcasts(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::BroadcastSend])
        .await?;

    let page = BroadcastService::new(&state.db)
        .sent(&current, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/broadcasts/my",
    tag = BROADCAST_TAG,
    params(ReceivedBroadcastFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of unexpired received broadcasts", body = ApiResponse<PageDto<ReceivedBroadcastDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn received_broadcasts(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ReceivedBroadcastFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = BroadcastService::new(&state.db)
        .received(&current, filter, pagination, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    put,
    path = "/api/broadcasts/{id}/read",
    tag = BROADCAST_TAG,
    params(("id" = i32, Path, description = "Broadcast ID")),
    responses(
        (status = 200, description = "Marked read", body = MessageDto),
        (status = 404, description = "Broadcast not addressed to the caller", body = ErrorDto)
    ),
)]
pub async fn mark_broadcast_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    BroadcastService::new(&state.db)
        .mark_read(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Broadcast marked as read"))))
}

#[utoipa::path(
    delete,
    path = "/api/broadcasts/{id}",
    tag = BROADCAST_TAG,
    params(("id" = i32, Path, description = "Broadcast ID")),
    responses(
        (status = 200, description = "Broadcast deleted", body = MessageDto),
        (status = 403, description = "Neither creator nor super admin", body = ErrorDto),
        (status = 404, description = "Broadcast not found", body = ErrorDto)
    ),
)]
pub async fn delete_broadcast(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    BroadcastService::new(&state.db).delete(&current, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Broadcast deleted"))))
}

#[utoipa::path(
    get,
    path = "/api/broadcasts/{id}/recipients",
    tag = BROADCAST_TAG,
    params(("id" = i32, Path, description = "Broadcast ID")),
    responses(
        (status = 200, description = "Recipients with read state", body = ApiResponse<Vec<RecipientDto>>),
        (status = 403, description = "Neither creator nor super admin", body = ErrorDto),
        (status = 404, description = "Broadcast not found", body = ErrorDto)
    ),
)]
pub async fn broadcast_recipients(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let recipients = BroadcastService::new(&state.db)
        .recipients(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(recipients))))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, CountDto, ErrorDto, MessageDto},
        chat::{
            AddChatMembersDto, ChatGroupDto, ChatHistoryQueryDto, ChatMemberDto, ChatMessageDto,
            CreateChatGroupDto, MuteChatGroupDto, SendChatMessageDto,
        },
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, push::PushEvent,
        service::chat::ChatService, state::AppState,
    },
};

/// Tag for grouping chat endpoints in OpenAPI documentation
pub static CHAT_TAG: &str = "chat";

/// Groups the caller belongs to, with unread counts and the latest message.
#[utoipa::path(
    get,
    path = "/api/chat/groups",
    tag = CHAT_TAG,
    responses(
        (status = 200, description = "The caller's chat groups", body = ApiResponse<Vec<ChatGroupDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_groups(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let groups = ChatService::new(&state.db).groups(&current).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(groups))))
}

/// Create a group. The creator becomes its admin.
#[utoipa::path(
    post,
    path = "/api/chat/groups",
    tag = CHAT_TAG,
    request_body = CreateChatGroupDto,
    responses(
        (status = 201, description = "Group created", body = ApiResponse<ChatGroupDto>),
        (status = 400, description = "Invalid name, department or member", body = ErrorDto)
    ),
)]
pub async fn create_group(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateChatGroupDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let group = ChatService::new(&state.db)
        .create_group(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(group))))
}

#[utoipa::path(
    get,
    path = "/api/chat/groups/{id}/members",
    tag = CHAT_TAG,
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group members", body = ApiResponse<Vec<ChatMemberDto>>),
        (status = 403, description = "Not a member and group outside scope", body = ErrorDto),
        (status = 404, description = "Group not found", body = ErrorDto)
    ),
)]
pub async fn list_members(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let members = ChatService::new(&state.db).members(&current, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(members))))
}

#[utoipa::path(
    post,
    path = "/api/chat/groups/{id}/members",
    tag = CHAT_TAG,
    params(("id" = i32, Path, description = "Group ID")),
    request_body = AddChatMembersDto,
    responses(
        (status = 200, description = "Members added", body = ApiResponse<Vec<ChatMemberDto>>),
        (status = 400, description = "Empty or unknown user ids", body = ErrorDto),
        (status = 403, description = "Caller is not a group admin", body = ErrorDto)
    ),
)]
pub async fn add_members(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<AddChatMembersDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let added = ChatService::new(&state.db)
        .add_members(&current, id, &payload.user_ids)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(added))))
}

/// Remove a member. Admins may remove anyone; every member may leave.
#[utoipa::path(
    delete,
    path = "/api/chat/groups/{id}/members/{user_id}",
    tag = CHAT_TAG,
    params(
        ("id" = i32, Path, description = "Group ID"),
        ("user_id" = i32, Path, description = "Member user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = MessageDto),
        (status = 403, description = "Caller is not a group admin", body = ErrorDto),
        (status = 404, description = "Group or membership not found", body = ErrorDto)
    ),
)]
pub async fn remove_member(
    State(state): State<AppState>,
    session: Session,
    Path((id, user_id)): Path<(i32, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ChatService::new(&state.db)
        .remove_member(&current, id, user_id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Member removed"))))
}

#[utoipa::path(
    get,
    path = "/api/chat/groups/{id}/messages",
    tag = CHAT_TAG,
    params(("id" = i32, Path, description = "Group ID"), ChatHistoryQueryDto),
    responses(
        (status = 200, description = "Messages, newest first", body = ApiResponse<Vec<ChatMessageDto>>),
        (status = 403, description = "Not a member and group outside scope", body = ErrorDto),
        (status = 404, description = "Group not found", body = ErrorDto)
    ),
)]
pub async fn list_messages(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Query(query): Query<ChatHistoryQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let messages = ChatService::new(&state.db)
        .messages(&current, id, query)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(messages))))
}

/// Post a message and push it to the other members.
#[utoipa::path(
    post,
    path = "/api/chat/groups/{id}/messages",
    tag = CHAT_TAG,
    params(("id" = i32, Path, description = "Group ID")),
    request_body = SendChatMessageDto,
    responses(
        (status = 201, description = "Message sent", body = ApiResponse<ChatMessageDto>),
        (status = 400, description = "Empty or too long content", body = ErrorDto),
        (status = 403, description = "Caller is not a member", body = ErrorDto)
    ),
)]
pub async fn send_message(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<SendChatMessageDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let (message, others) = ChatService::new(&state.db)
        .send(&current, id, &payload.content)
        .await?;
    state.push.send_to_users(
        others,
        PushEvent::ChatMessage {
            data: message.clone(),
        },
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

#[utoipa::path(
    put,
    path = "/api/chat/groups/{id}/read",
    tag = CHAT_TAG,
    params(("id" = i32, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group marked read", body = MessageDto),
        (status = 403, description = "Caller is not a member", body = ErrorDto)
    ),
)]
pub async fn mark_group_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ChatService::new(&state.db).mark_read(&current, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Group marked as read"))))
}

#[utoipa::path(
    put,
    path = "/api/chat/groups/{id}/mute",
    tag = CHAT_TAG,
    params(("id" = i32, Path, description = "Group ID")),
    request_body = MuteChatGroupDto,
    responses(
        (status = 200, description = "Mute flag updated", body = MessageDto),
        (status = 403, description = "Caller is not a member", body = ErrorDto)
    ),
)]
pub async fn mute_group(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<MuteChatGroupDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ChatService::new(&state.db)
        .set_muted(&current, id, payload.muted)
        .await?;

    let message = if payload.muted {
        "Group muted"
    } else {
        "Group unmuted"
    };
    Ok((StatusCode::OK, Json(MessageDto::new(message))))
}

/// Unread messages across all unmuted groups.
#[utoipa::path(
    get,
    path = "/api/chat/unread-count",
    tag = CHAT_TAG,
    responses(
        (status = 200, description = "Unread chat messages", body = ApiResponse<CountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn chat_unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let count = ChatService::new(&state.db).unread_count(&current).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, CountDto, ErrorDto, MessageDto, PageDto, PaginationParams},
        memo::{
            CreateDepartmentMemoDto, CreatePersonalMemoDto, MemoDto, MemoFilterDto,
            MemoRecipientDto, SentMemoDto, UpdatePersonalMemoDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        push::PushEvent,
        service::memo::MemoService,
        state::AppState,
    },
};

/// Tag for grouping memo endpoints in OpenAPI documentation
pub static MEMO_TAG: &str = "memo";

#[utoipa::path(
    post,
    path = "/api/memos/personal",
    tag = MEMO_TAG,
    request_body = CreatePersonalMemoDto,
    responses(
        (status = 201, description = "Memo created", body = ApiResponse<MemoDto>),
        (status = 400, description = "Invalid title, content or priority", body = ErrorDto)
    ),
)]
pub async fn create_personal_memo(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreatePersonalMemoDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let memo = MemoService::new(&state.db)
        .create_personal(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(memo))))
}

#[utoipa::path(
    put,
    path = "/api/memos/personal/{id}",
    tag = MEMO_TAG,
    params(("id" = i32, Path, description = "Memo ID")),
    request_body = UpdatePersonalMemoDto,
    responses(
        (status = 200, description = "Memo updated", body = ApiResponse<MemoDto>),
        (status = 404, description = "Not one of the caller's personal memos", body = ErrorDto)
    ),
)]
pub async fn update_personal_memo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdatePersonalMemoDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let memo = MemoService::new(&state.db)
        .update_personal(&current, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(memo))))
}

#[utoipa::path(
    delete,
    path = "/api/memos/personal/{id}",
    tag = MEMO_TAG,
    params(("id" = i32, Path, description = "Memo ID")),
    responses(
        (status = 200, description = "Memo deleted", body = MessageDto),
        (status = 404, description = "Not one of the caller's personal memos", body = ErrorDto)
    ),
)]
pub async fn delete_personal_memo(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    MemoService::new(&state.db)
        .delete_personal(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Memo deleted"))))
}

/// Memos delivered to the caller, personal and department ones.
#[utoipa::path(
    get,
    path = "/api/memos/my",
    tag = MEMO_TAG,
    params(MemoFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of received memos", body = ApiResponse<PageDto<MemoDto>>),
        (status = 400, description = "Unknown memo type", body = ErrorDto)
    ),
)]
pub async fn my_memos(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<MemoFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = MemoService::new(&state.db)
        .received(&current, filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/memos/unread-count",
    tag = MEMO_TAG,
    responses(
        (status = 200, description = "Unread memos", body = ApiResponse<CountDto>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn memo_unread_count(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let count = MemoService::new(&state.db).unread_count(&current).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

#[utoipa::path(
    put,
    path = "/api/memos/{id}/read",
    tag = MEMO_TAG,
    params(("id" = i32, Path, description = "Memo ID")),
    responses(
        (status = 200, description = "Memo marked read", body = MessageDto),
        (status = 404, description = "Memo not delivered to the caller", body = ErrorDto)
    ),
)]
pub async fn mark_memo_read(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    MemoService::new(&state.db).mark_read(&current, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Memo marked as read"))))
}

/// Send a memo to every active employee of the given departments.
///
/// Each recipient receives its copy over WebSocket.
///
/// # Returns
/// - `201 Created` - The memo with its recipient count
/// - `400 Bad Request` - Invalid data, unknown departments or no recipients
/// - `403 Forbidden` - Missing `memo:send` or department outside scope
#[utoipa::path(
    post,
    path = "/api/memos/department",
    tag = MEMO_TAG,
    request_body = CreateDepartmentMemoDto,
    responses(
        (status = 201, description = "Memo sent", body = ApiResponse<SentMemoDto>),
        (status = 400, description = "Invalid memo", body = ErrorDto),
        (status = 403, description = "Missing memo:send or department out of scope", body = ErrorDto)
    ),
)]
pub async fn create_department_memo(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateDepartmentMemoDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::MemoSend])
        .await?;

    let (sent, copies) = MemoService::new(&state.db)
        .create_department(&current, payload)
        .await?;
    for (user_id, memo) in copies {
        state
            .push
            .send_to_users(vec![user_id], PushEvent::Memo { data: memo });
    }

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(sent))))
}

#[utoipa::path(
    get,
    path = "/api/memos/department/created",
    tag = MEMO_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of department memos written by the caller", body = ApiResponse<PageDto<SentMemoDto>>),
        (status = 403, description = "Missing memo:send", body = ErrorDto)
    ),
)]
pub async fn sent_department_memos(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::MemoSend])
        .await?;

    let page = MemoService::new(&state.db)
        .sent(&current, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/memos/department/{id}/recipients",
    tag = MEMO_TAG,
    params(("id" = i32, Path, description = "Memo ID")),
    responses(
        (status = 200, description = "Recipients with read state", body = ApiResponse<Vec<MemoRecipientDto>>),
        (status = 403, description = "Caller did not write the memo", body = ErrorDto),
        (status = 404, description = "Memo not found", body = ErrorDto)
    ),
)]
pub async fn department_memo_recipients(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let recipients = MemoService::new(&state.db)
        .recipients(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(recipients))))
}

//! Expense reimbursement claims.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, MessageDto, PageDto, PaginationParams},
        reimbursement::{
            CreateReimbursementDto, ReimbursementDecisionDto, ReimbursementDetailDto,
            ReimbursementDto, ReimbursementFilterDto, UpdateReimbursementDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::reimbursement::ReimbursementService,
        state::AppState,
    },
};

pub static REIMBURSEMENT_TAG: &str = "reimbursement";

/// Create a claim as a draft, or submit it at once with `submit: true`.
#[utoipa::path(
    post,
    path = "/api/reimbursements",
    tag = REIMBURSEMENT_TAG,
    request_body = CreateReimbursementDto,
    responses(
        (status = 201, description = "Claim created", body = ApiResponse<ReimbursementDetailDto>),
        (status = 400, description = "Invalid claim or items", body = ErrorDto)
    ),
)]
pub async fn create_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateReimbursementDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let claim = ReimbursementService::new(&state.db)
        .create(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(claim))))
}

#[utoipa::path(
    get,
    path = "/api/reimbursements/my",
    tag = REIMBURSEMENT_TAG,
    params(ReimbursementFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of the caller's claims", body = ApiResponse<PageDto<ReimbursementDto>>),
        (status = 400, description = "Unknown status", body = ErrorDto)
    ),
)]
pub async fn my_reimbursements(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ReimbursementFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = ReimbursementService::new(&state.db)
        .list_mine(&current, filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

/// Pending claims in the approver's department scope.
#[utoipa::path(
    get,
    path = "/api/reimbursements/pending",
    tag = REIMBURSEMENT_TAG,
    params(PaginationParams),
    responses(
        (status = 200, description = "Page of pending claims", body = ApiResponse<PageDto<ReimbursementDto>>),
        (status = 403, description = "Missing reimbursement:approve", body = ErrorDto)
    ),
)]
pub async fn pending_reimbursements(
    State(state): State<AppState>,
    session: Session,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ReimbursementApprove])
        .await?;

    let page = ReimbursementService::new(&state.db)
        .pending(&current, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/reimbursements/{id}",
    tag = REIMBURSEMENT_TAG,
    params(("id" = i32, Path, description = "Claim ID")),
    responses(
        (status = 200, description = "Claim with items and history", body = ApiResponse<ReimbursementDetailDto>),
        (status = 403, description = "Not the owner nor an approver in scope", body = ErrorDto),
        (status = 404, description = "Claim not found", body = ErrorDto)
    ),
)]
pub async fn get_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let claim = ReimbursementService::new(&state.db).get(&current, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(claim))))
}

/// Replace a draft's content and items.
#[utoipa::path(
    put,
    path = "/api/reimbursements/{id}",
    tag = REIMBURSEMENT_TAG,
    params(("id" = i32, Path, description = "Claim ID")),
    request_body = UpdateReimbursementDto,
    responses(
        (status = 200, description = "Draft updated", body = ApiResponse<ReimbursementDetailDto>),
        (status = 400, description = "Not a draft or invalid items", body = ErrorDto),
        (status = 403, description = "Not the owner", body = ErrorDto)
    ),
)]
pub async fn update_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateReimbursementDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let claim = ReimbursementService::new(&state.db)
        .update(&current, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(claim))))
}

#[utoipa::path(
    delete,
    path = "/api/reimbursements/{id}",
    tag = REIMBURSEMENT_TAG,
    params(("id" = i32, Path, description = "Claim ID")),
    responses(
        (status = 200, description = "Claim deleted", body = MessageDto),
        (status = 400, description = "Only drafts and cancelled claims can be deleted", body = ErrorDto),
        (status = 403, description = "Not the owner", body = ErrorDto)
    ),
)]
pub async fn delete_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    ReimbursementService::new(&state.db)
        .delete(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Reimbursement deleted"))))
}

#[utoipa::path(
    post,
    path = "/api/reimbursements/{id}/submit",
    tag = REIMBURSEMENT_TAG,
    params(("id" = i32, Path, description = "Claim ID")),
    responses(
        (status = 200, description = "Claim submitted", body = ApiResponse<ReimbursementDetailDto>),
        (status = 400, description = "Not a draft", body = ErrorDto)
    ),
)]
pub async fn submit_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let claim = ReimbursementService::new(&state.db)
        .submit(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(claim))))
}

#[utoipa::path(
    post,
    path = "/api/reimbursements/{id}/cancel",
    tag = REIMBURSEMENT_TAG,
    params(("id" = i32, Path, description = "Claim ID")),
    responses(
        (status = 200, description = "Claim cancelled", body = ApiResponse<ReimbursementDetailDto>),
        (status = 400, description = "Already decided", body = ErrorDto)
    ),
)]
pub async fn cancel_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let claim = ReimbursementService::new(&state.db)
        .cancel(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(claim))))
}

/// Approve or reject a pending claim. The claimant is notified.
#[utoipa::path(
    post,
    path = "/api/reimbursements/{id}/approval",
    tag = REIMBURSEMENT_TAG,
    params(("id" = i32, Path, description = "Claim ID")),
    request_body = ReimbursementDecisionDto,
    responses(
        (status = 200, description = "Claim decided", body = ApiResponse<ReimbursementDetailDto>),
        (status = 400, description = "Not pending, unknown action or own claim", body = ErrorDto),
        (status = 403, description = "Missing reimbursement:approve or outside scope", body = ErrorDto)
    ),
)]
pub async fn decide_reimbursement(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ReimbursementDecisionDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ReimbursementApprove])
        .await?;

    let (claim, notification) = ReimbursementService::new(&state.db)
        .decide(&current, id, payload)
        .await?;
    state.push.notify(vec![notification]);

    Ok((StatusCode::OK, Json(ApiResponse::ok(claim))))
}

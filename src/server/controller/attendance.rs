//! Overtime and leave requests with their approval flow.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, PageDto, PaginationParams},
        attendance::{
            ApplyLeaveDto, ApplyOvertimeDto, ApprovalDto, AttendanceFilterDto, LeaveDto,
            OvertimeDto, OvertimeStatsDto, OvertimeStatsQueryDto, PendingLeaveQueryDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::attendance::RequestStatus,
        service::attendance::AttendanceService,
        state::AppState,
        util::time::current_year,
    },
};

/// Tag for grouping attendance endpoints in OpenAPI documentation
pub static ATTENDANCE_TAG: &str = "attendance";

/// Apply for overtime, for oneself or (with `attendance:approve`) for another employee.
#[utoipa::path(
    post,
    path = "/api/overtime/apply",
    tag = ATTENDANCE_TAG,
    request_body = ApplyOvertimeDto,
    responses(
        (status = 201, description = "Overtime request created", body = ApiResponse<OvertimeDto>),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 403, description = "Applying for another employee without permission", body = ErrorDto)
    ),
)]
pub async fn apply_overtime(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ApplyOvertimeDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let overtime = AttendanceService::new(&state.db)
        .apply_overtime(&current, payload, state.utc_offset)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(overtime))))
}

#[utoipa::path(
    get,
    path = "/api/overtime/records",
    tag = ATTENDANCE_TAG,
    params(AttendanceFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of overtime records", body = ApiResponse<PageDto<OvertimeDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_overtime(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<AttendanceFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = AttendanceService::new(&state.db)
        .list_overtime(&current, filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

/// Approve a pending overtime request. The requester is notified.
#[utoipa::path(
    post,
    path = "/api/overtime/records/{id}/approve",
    tag = ATTENDANCE_TAG,
    params(("id" = i32, Path, description = "Overtime record ID")),
    request_body = ApprovalDto,
    responses(
        (status = 200, description = "Overtime approved", body = ApiResponse<OvertimeDto>),
        (status = 400, description = "Record is not pending", body = ErrorDto),
        (status = 403, description = "Missing attendance:approve", body = ErrorDto),
        (status = 404, description = "Record not found", body = ErrorDto)
    ),
)]
pub async fn approve_overtime(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ApprovalDto>,
) -> Result<impl IntoResponse, AppError> {
    decide_overtime(state, session, id, RequestStatus::Approved, payload).await
}

/// Reject a pending overtime request. The requester is notified.
#[utoipa::path(
    post,
    path = "/api/overtime/records/{id}/reject",
    tag = ATTENDANCE_TAG,
    params(("id" = i32, Path, description = "Overtime record ID")),
    request_body = ApprovalDto,
    responses(
        (status = 200, description = "Overtime rejected", body = ApiResponse<OvertimeDto>),
        (status = 400, description = "Record is not pending", body = ErrorDto),
        (status = 403, description = "Missing attendance:approve", body = ErrorDto),
        (status = 404, description = "Record not found", body = ErrorDto)
    ),
)]
pub async fn reject_overtime(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ApprovalDto>,
) -> Result<impl IntoResponse, AppError> {
    decide_overtime(state, session, id, RequestStatus::Rejected, payload).await
}

async fn decide_overtime(
    state: AppState,
    session: Session,
    id: i32,
    status: RequestStatus,
    payload: ApprovalDto,
) -> Result<(StatusCode, Json<ApiResponse<OvertimeDto>>), AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AttendanceApprove])
        .await?;

    let (overtime, notification) = AttendanceService::new(&state.db)
        .decide_overtime(&current, id, status, payload.approval_note)
        .await?;
    state.push.notify(vec![notification]);

    Ok((StatusCode::OK, Json(ApiResponse::ok(overtime))))
}

#[utoipa::path(
    get,
    path = "/api/overtime/stats",
    tag = ATTENDANCE_TAG,
    params(OvertimeStatsQueryDto),
    responses(
        (status = 200, description = "Approved and pending hours and counts", body = ApiResponse<OvertimeStatsDto>),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto)
    ),
)]
pub async fn overtime_stats(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<OvertimeStatsQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let year = query.year.unwrap_or_else(|| current_year(state.utc_offset));
    let stats = AttendanceService::new(&state.db)
        .overtime_stats(&current, query.employee_id, year)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(stats))))
}

/// Apply for leave. Overlapping pending or approved requests are rejected.
#[utoipa::path(
    post,
    path = "/api/leave/apply",
    tag = ATTENDANCE_TAG,
    request_body = ApplyLeaveDto,
    responses(
        (status = 201, description = "Leave request created", body = ApiResponse<LeaveDto>),
        (status = 400, description = "Invalid request or overlapping leave", body = ErrorDto),
        (status = 403, description = "Applying for another employee without permission", body = ErrorDto)
    ),
)]
pub async fn apply_leave(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ApplyLeaveDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let leave = AttendanceService::new(&state.db)
        .apply_leave(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(leave))))
}

#[utoipa::path(
    get,
    path = "/api/leave/records",
    tag = ATTENDANCE_TAG,
    params(AttendanceFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of leave records", body = ApiResponse<PageDto<LeaveDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_leave(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<AttendanceFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = AttendanceService::new(&state.db)
        .list_leave(&current, filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/leave/pending",
    tag = ATTENDANCE_TAG,
    params(PendingLeaveQueryDto),
    responses(
        (status = 200, description = "Pending leave requests in scope", body = ApiResponse<Vec<LeaveDto>>),
        (status = 403, description = "Missing attendance:approve", body = ErrorDto)
    ),
)]
pub async fn pending_leave(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<PendingLeaveQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AttendanceApprove])
        .await?;

    let pending = AttendanceService::new(&state.db)
        .pending_leave(&current, query.department_id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(pending))))
}

/// Approve a pending leave request.
///
/// Deducts the days from the balance of the start date's year, marks the range as
/// rest days in the schedule and notifies the employee, all in one transaction.
///
/// # Returns
/// - `200 OK` - The approved request
/// - `400 Bad Request` - Not pending or insufficient balance
/// - `403 Forbidden` - Missing permission or employee out of scope
/// - `404 Not Found` - Record not found
#[utoipa::path(
    post,
    path = "/api/leave/records/{id}/approve",
    tag = ATTENDANCE_TAG,
    params(("id" = i32, Path, description = "Leave record ID")),
    request_body = ApprovalDto,
    responses(
        (status = 200, description = "Leave approved", body = ApiResponse<LeaveDto>),
        (status = 400, description = "Not pending or insufficient balance", body = ErrorDto),
        (status = 403, description = "Missing attendance:approve", body = ErrorDto),
        (status = 404, description = "Record not found", body = ErrorDto)
    ),
)]
pub async fn approve_leave(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ApprovalDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AttendanceApprove])
        .await?;

    let (leave, notification) = AttendanceService::new(&state.db)
        .approve_leave(&current, id, payload.approval_note)
        .await?;
    state.push.notify(vec![notification]);

    Ok((StatusCode::OK, Json(ApiResponse::ok(leave))))
}

#[utoipa::path(
    post,
    path = "/api/leave/records/{id}/reject",
    tag = ATTENDANCE_TAG,
    params(("id" = i32, Path, description = "Leave record ID")),
    request_body = ApprovalDto,
    responses(
        (status = 200, description = "Leave rejected", body = ApiResponse<LeaveDto>),
        (status = 400, description = "Record is not pending", body = ErrorDto),
        (status = 403, description = "Missing attendance:approve", body = ErrorDto),
        (status = 404, description = "Record not found", body = ErrorDto)
    ),
)]
pub async fn reject_leave(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<ApprovalDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::AttendanceApprove])
        .await?;

    let (leave, notification) = AttendanceService::new(&state.db)
        .reject_leave(&current, id, payload.approval_note)
        .await?;
    state.push.notify(vec![notification]);

    Ok((StatusCode::OK, Json(ApiResponse::ok(leave))))
}

/// Cancel a pending leave request. Allowed for the owner and for approvers.
#[utoipa::path(
    post,
    path = "/api/leave/records/{id}/cancel",
    tag = ATTENDANCE_TAG,
    params(("id" = i32, Path, description = "Leave record ID")),
    responses(
        (status = 200, description = "Leave cancelled", body = ApiResponse<LeaveDto>),
        (status = 400, description = "Record is not pending", body = ErrorDto),
        (status = 403, description = "Neither owner nor approver", body = ErrorDto),
        (status = 404, description = "Record not found", body = ErrorDto)
    ),
)]
pub async fn cancel_leave(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let leave = AttendanceService::new(&state.db)
        .cancel_leave(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(leave))))
}

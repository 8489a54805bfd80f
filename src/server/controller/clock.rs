//! Daily clock-in, clock-out and attendance records.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, PaginationParams},
        clock::{
            ClockRecordDto, ClockRecordsDto, ClockRecordsQueryDto, ClockResultDto,
            ClockTodayQueryDto,
        },
    },
    server::{
        error::AppError, middleware::auth::AuthGuard, service::clock::ClockService,
        state::AppState,
    },
};

pub static CLOCK_TAG: &str = "clock";

/// Clock in for today. A late clock-in also notifies the employee.
#[utoipa::path(
    post,
    path = "/api/attendance/clock-in",
    tag = CLOCK_TAG,
    responses(
        (status = 201, description = "Clocked in", body = ApiResponse<ClockResultDto>),
        (status = 400, description = "Already clocked in or no employee record", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn clock_in(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let (result, notification) = ClockService::new(&state.db, state.clock_rules)
        .clock_in(&current, Utc::now())
        .await?;
    state.push.notify(notification.into_iter().collect());

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(result))))
}

/// Clock out of today's record, or of an overnight shift started yesterday.
#[utoipa::path(
    post,
    path = "/api/attendance/clock-out",
    tag = CLOCK_TAG,
    responses(
        (status = 200, description = "Clocked out", body = ApiResponse<ClockResultDto>),
        (status = 400, description = "Not clocked in or already clocked out", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn clock_out(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let (result, notification) = ClockService::new(&state.db, state.clock_rules)
        .clock_out(&current, Utc::now())
        .await?;
    state.push.notify(notification.into_iter().collect());

    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}

#[utoipa::path(
    get,
    path = "/api/attendance/today",
    tag = CLOCK_TAG,
    params(ClockTodayQueryDto),
    responses(
        (status = 200, description = "Today's record, null before clocking in", body = ApiResponse<Option<ClockRecordDto>>),
        (status = 403, description = "Employee outside the viewable scope", body = ErrorDto)
    ),
)]
pub async fn today(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ClockTodayQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let record = ClockService::new(&state.db, state.clock_rules)
        .today(&current, query.employee_id, Utc::now())
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(record))))
}

/// Page of clock records with statistics for the date range.
#[utoipa::path(
    get,
    path = "/api/attendance/records",
    tag = CLOCK_TAG,
    params(ClockRecordsQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Records and statistics", body = ApiResponse<ClockRecordsDto>),
        (status = 400, description = "Invalid date range or status", body = ErrorDto),
        (status = 403, description = "Employee outside the viewable scope", body = ErrorDto)
    ),
)]
pub async fn records(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ClockRecordsQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let records = ClockService::new(&state.db, state.clock_rules)
        .records(&current, query, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(records))))
}

//! Vacation balance ledger and overtime conversion.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, CountDto, ErrorDto, PageDto, PaginationParams},
        vacation::{
            AdjustBalanceDto, AuditLogDto, AvailableOvertimeDto, BalanceDto,
            BalanceOverviewQueryDto, BatchAdjustBalanceDto, ConversionHistoryQueryDto,
            ConvertOvertimeDto, EmployeeBalancesDto, OvertimeConversionDto, YearQueryDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::balance::BalanceService,
        state::AppState,
        util::time::current_year,
    },
};

/// Tag for grouping balance endpoints in OpenAPI documentation
pub static BALANCE_TAG: &str = "balance";

/// Get an employee's balances for a year, one row per enabled vacation type.
///
/// Statutory days are re-synced from the holiday entries on every read.
///
/// # Returns
/// - `200 OK` - Balances of the employee
/// - `403 Forbidden` - Employee outside the viewable set
/// - `404 Not Found` - Employee not found
#[utoipa::path(
    get,
    path = "/api/vacation/balances/{employee_id}",
    tag = BALANCE_TAG,
    params(("employee_id" = i32, Path, description = "Employee ID"), YearQueryDto),
    responses(
        (status = 200, description = "Balances of the employee", body = ApiResponse<EmployeeBalancesDto>),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto)
    ),
)]
pub async fn employee_balances(
    State(state): State<AppState>,
    session: Session,
    Path(employee_id): Path<i32>,
    Query(query): Query<YearQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let year = query.year.unwrap_or_else(|| current_year(state.utc_offset));
    let balances = BalanceService::new(&state.db)
        .employee_balances(&current, employee_id, year)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(balances))))
}

/// Get a page of balances for every employee in scope.
#[utoipa::path(
    get,
    path = "/api/vacation/balances",
    tag = BALANCE_TAG,
    params(BalanceOverviewQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Page of employee balances", body = ApiResponse<PageDto<EmployeeBalancesDto>>),
        (status = 403, description = "Missing vacation:manage", body = ErrorDto)
    ),
)]
pub async fn balance_overview(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BalanceOverviewQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let year = query.year.unwrap_or_else(|| current_year(state.utc_offset));
    let page = BalanceService::new(&state.db)
        .overview(&current, query, year, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

/// Adjust one balance. `set` targets the remaining days; results never go below zero.
#[utoipa::path(
    post,
    path = "/api/vacation/balances/{employee_id}/adjust",
    tag = BALANCE_TAG,
    params(("employee_id" = i32, Path, description = "Employee ID")),
    request_body = AdjustBalanceDto,
    responses(
        (status = 200, description = "Adjusted balance", body = ApiResponse<BalanceDto>),
        (status = 400, description = "Invalid adjustment", body = ErrorDto),
        (status = 403, description = "Missing vacation:manage or employee out of scope", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto)
    ),
)]
pub async fn adjust_balance(
    State(state): State<AppState>,
    session: Session,
    Path(employee_id): Path<i32>,
    Json(payload): Json<AdjustBalanceDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let balance = BalanceService::new(&state.db)
        .adjust(&current, employee_id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(balance))))
}

/// Apply the same adjustment to several employees in one transaction.
#[utoipa::path(
    post,
    path = "/api/vacation/balances/batch-adjust",
    tag = BALANCE_TAG,
    request_body = BatchAdjustBalanceDto,
    responses(
        (status = 200, description = "Number of adjusted balances", body = ApiResponse<CountDto>),
        (status = 400, description = "Invalid adjustment or unknown employee", body = ErrorDto),
        (status = 403, description = "Missing vacation:manage or employee out of scope", body = ErrorDto)
    ),
)]
pub async fn batch_adjust_balances(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BatchAdjustBalanceDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let count = BalanceService::new(&state.db)
        .batch_adjust(&current, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

#[utoipa::path(
    get,
    path = "/api/vacation/balances/{employee_id}/history",
    tag = BALANCE_TAG,
    params(("employee_id" = i32, Path, description = "Employee ID"), YearQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Audit entries, newest first", body = ApiResponse<PageDto<AuditLogDto>>),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto)
    ),
)]
pub async fn balance_history(
    State(state): State<AppState>,
    session: Session,
    Path(employee_id): Path<i32>,
    Query(query): Query<YearQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = BalanceService::new(&state.db)
        .history(&current, employee_id, query.year, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

/// Convert approved overtime hours into vacation days for the current year.
///
/// # Returns
/// - `201 Created` - The conversion record
/// - `400 Bad Request` - Non-positive hours, not enough available hours, unknown type or rule
/// - `403 Forbidden` - Missing permission or employee out of scope
#[utoipa::path(
    post,
    path = "/api/vacation/overtime/convert",
    tag = BALANCE_TAG,
    request_body = ConvertOvertimeDto,
    responses(
        (status = 201, description = "Overtime converted", body = ApiResponse<OvertimeConversionDto>),
        (status = 400, description = "Invalid conversion", body = ErrorDto),
        (status = 403, description = "Missing vacation:manage or employee out of scope", body = ErrorDto)
    ),
)]
pub async fn convert_overtime(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ConvertOvertimeDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let year = current_year(state.utc_offset);
    let conversion = BalanceService::new(&state.db)
        .convert_overtime(&current, payload, year)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(conversion))))
}

#[utoipa::path(
    get,
    path = "/api/vacation/overtime/conversions",
    tag = BALANCE_TAG,
    params(ConversionHistoryQueryDto, PaginationParams),
    responses(
        (status = 200, description = "Conversion history", body = ApiResponse<PageDto<OvertimeConversionDto>>),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto)
    ),
)]
pub async fn list_conversions(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ConversionHistoryQueryDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let page = BalanceService::new(&state.db)
        .conversions(&current, query.employee_id, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/vacation/overtime/available/{employee_id}",
    tag = BALANCE_TAG,
    params(("employee_id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Approved, converted and available hours", body = ApiResponse<AvailableOvertimeDto>),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto)
    ),
)]
pub async fn available_overtime(
    State(state): State<AppState>,
    session: Session,
    Path(employee_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let available = BalanceService::new(&state.db)
        .available(&current, employee_id)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(available))))
}

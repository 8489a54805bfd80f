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
        employee::{CreateEmployeeDto, EmployeeDto, EmployeeFilterDto, UpdateEmployeeDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::employee::EmployeeService,
        state::AppState,
    },
};

/// Tag for grouping employee endpoints in OpenAPI documentation
pub static EMPLOYEE_TAG: &str = "employee";

/// Get a page of employees in the caller's viewable departments.
///
/// # Access Control
/// - `employee:view`
///
/// # Returns
/// - `200 OK` - Page of employees matching the keyword, department and status filters
/// - `401 Unauthorized` - Not logged in
/// - `403 Forbidden` - Missing permission
#[utoipa::path(
    get,
    path = "/api/employees",
    tag = EMPLOYEE_TAG,
    params(EmployeeFilterDto, PaginationParams),
    responses(
        (status = 200, description = "Page of employees", body = ApiResponse<PageDto<EmployeeDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Missing employee:view", body = ErrorDto)
    ),
)]
pub async fn list_employees(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<EmployeeFilterDto>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EmployeeView])
        .await?;

    let page = EmployeeService::new(&state.db)
        .get_paginated(&current, filter, pagination)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(page))))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = EMPLOYEE_TAG,
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "The employee", body = ApiResponse<EmployeeDto>),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto)
    ),
)]
pub async fn get_employee(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EmployeeView])
        .await?;

    let employee = EmployeeService::new(&state.db).get(&current, id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(employee.into_dto()))))
}

/// Create a user account and its employee record in one transaction.
#[utoipa::path(
    post,
    path = "/api/employees",
    tag = EMPLOYEE_TAG,
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = ApiResponse<EmployeeDto>),
        (status = 400, description = "Invalid data or duplicate username/employee number", body = ErrorDto),
        (status = 403, description = "Missing employee:manage", body = ErrorDto)
    ),
)]
pub async fn create_employee(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateEmployeeDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EmployeeManage])
        .await?;

    let employee = EmployeeService::new(&state.db).create(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(employee.into_dto()))))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = EMPLOYEE_TAG,
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<EmployeeDto>),
        (status = 400, description = "Invalid data", body = ErrorDto),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto),
        (status = 404, description = "Employee not found", body = ErrorDto)
    ),
)]
pub async fn update_employee(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateEmployeeDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EmployeeManage])
        .await?;

    let employee = EmployeeService::new(&state.db)
        .update(&current, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(employee.into_dto()))))
}

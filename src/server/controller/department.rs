use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, MessageDto},
        department::{CreateDepartmentDto, DepartmentDto, UpdateDepartmentDto},
        employee::EmployeeDto,
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::department::DepartmentService,
        state::AppState,
    },
};

/// Tag for grouping department endpoints in OpenAPI documentation
pub static DEPARTMENT_TAG: &str = "department";

/// List the departments the caller may view, ordered by sort order.
#[utoipa::path(
    get,
    path = "/api/departments",
    tag = DEPARTMENT_TAG,
    responses(
        (status = 200, description = "Viewable departments", body = ApiResponse<Vec<DepartmentDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_departments(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let departments = DepartmentService::new(&state.db)
        .list_visible(&current)
        .await?;
    let departments: Vec<DepartmentDto> = departments.into_iter().map(|d| d.into_dto()).collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(departments))))
}

/// List every active department, for pickers.
#[utoipa::path(
    get,
    path = "/api/departments/all",
    tag = DEPARTMENT_TAG,
    responses(
        (status = 200, description = "Active departments", body = ApiResponse<Vec<DepartmentDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_all_departments(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let departments = DepartmentService::new(&state.db).list_active().await?;
    let departments: Vec<DepartmentDto> = departments.into_iter().map(|d| d.into_dto()).collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(departments))))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "The department", body = ApiResponse<DepartmentDto>),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn get_department(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let department = DepartmentService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(department.into_dto()))))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    tag = DEPARTMENT_TAG,
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = ApiResponse<DepartmentDto>),
        (status = 400, description = "Invalid department data", body = ErrorDto),
        (status = 403, description = "Missing department:manage", body = ErrorDto)
    ),
)]
pub async fn create_department(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateDepartmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::DepartmentManage])
        .await?;

    let department = DepartmentService::new(&state.db).create(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(department.into_dto()))))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = ApiResponse<DepartmentDto>),
        (status = 400, description = "Invalid department data", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn update_department(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateDepartmentDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::DepartmentManage])
        .await?;

    let department = DepartmentService::new(&state.db).update(id, payload).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(department.into_dto()))))
}

/// Delete a department that no user or child department references.
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = MessageDto),
        (status = 400, description = "Department still referenced", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn delete_department(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::DepartmentManage])
        .await?;

    DepartmentService::new(&state.db).delete(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Department deleted"))))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}/employees",
    tag = DEPARTMENT_TAG,
    params(("id" = i32, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Active employees of the department", body = ApiResponse<Vec<EmployeeDto>>),
        (status = 403, description = "Department outside the viewable set", body = ErrorDto),
        (status = 404, description = "Department not found", body = ErrorDto)
    ),
)]
pub async fn department_employees(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::EmployeeView])
        .await?;

    let employees = DepartmentService::new(&state.db)
        .employees(&current, id)
        .await?;
    let employees: Vec<EmployeeDto> = employees.into_iter().map(|e| e.into_dto()).collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(employees))))
}

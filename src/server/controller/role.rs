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
        role::{AssignRolesDto, CreateRoleDto, PermissionDto, RoleDto, UpdateRoleDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        model::role::permission_into_dto,
        service::role::RoleService,
        state::AppState,
    },
};

/// Tag for grouping role endpoints in OpenAPI documentation
pub static ROLE_TAG: &str = "role";

/// List the permission catalogue.
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "Permission catalogue", body = ApiResponse<Vec<PermissionDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Missing role:manage", body = ErrorDto)
    ),
)]
pub async fn list_permissions(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    let permissions = RoleService::new(&state.db).list_permissions().await?;
    let permissions: Vec<PermissionDto> =
        permissions.into_iter().map(permission_into_dto).collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(permissions))))
}

#[utoipa::path(
    get,
    path = "/api/roles",
    tag = ROLE_TAG,
    responses(
        (status = 200, description = "All roles", body = ApiResponse<Vec<RoleDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Missing role:manage", body = ErrorDto)
    ),
)]
pub async fn list_roles(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    let roles = RoleService::new(&state.db).list().await?;
    let roles: Vec<RoleDto> = roles.into_iter().map(|r| r.into_dto()).collect();

    Ok((StatusCode::OK, Json(ApiResponse::ok(roles))))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "The role", body = ApiResponse<RoleDto>),
        (status = 404, description = "Role not found", body = ErrorDto)
    ),
)]
pub async fn get_role(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    let role = RoleService::new(&state.db).get(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(role.into_dto()))))
}

/// Create a role.
///
/// # Returns
/// - `201 Created` - The new role
/// - `400 Bad Request` - Duplicate name, unknown permission code or department id
#[utoipa::path(
    post,
    path = "/api/roles",
    tag = ROLE_TAG,
    request_body = CreateRoleDto,
    responses(
        (status = 201, description = "Role created", body = ApiResponse<RoleDto>),
        (status = 400, description = "Invalid role data", body = ErrorDto),
        (status = 403, description = "Missing role:manage", body = ErrorDto)
    ),
)]
pub async fn create_role(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateRoleDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    let role = RoleService::new(&state.db).create(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(role.into_dto()))))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "Role ID")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<RoleDto>),
        (status = 400, description = "Invalid role data", body = ErrorDto),
        (status = 404, description = "Role not found", body = ErrorDto)
    ),
)]
pub async fn update_role(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateRoleDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    let role = RoleService::new(&state.db).update(id, payload).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(role.into_dto()))))
}

/// Delete a role. The super-admin role cannot be deleted.
#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "Role ID")),
    responses(
        (status = 200, description = "Role deleted", body = MessageDto),
        (status = 400, description = "Super-admin role", body = ErrorDto),
        (status = 404, description = "Role not found", body = ErrorDto)
    ),
)]
pub async fn delete_role(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    RoleService::new(&state.db).delete(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Role deleted"))))
}

/// Replace the roles of a user.
#[utoipa::path(
    put,
    path = "/api/users/{id}/roles",
    tag = ROLE_TAG,
    params(("id" = i32, Path, description = "User ID")),
    request_body = AssignRolesDto,
    responses(
        (status = 200, description = "Role ids now assigned", body = ApiResponse<Vec<i32>>),
        (status = 400, description = "Unknown role id", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto)
    ),
)]
pub async fn assign_roles(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<AssignRolesDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::RoleManage])
        .await?;

    let role_ids = RoleService::new(&state.db)
        .assign(id, &payload.role_ids)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(role_ids))))
}

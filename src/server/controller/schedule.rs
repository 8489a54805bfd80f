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
        schedule::{
            BatchDeleteDto, BatchScheduleDto, CopySchedulesDto, CopySchedulesResultDto,
            CreateShiftDto, ScheduleDto, ScheduleQueryDto, ShiftDto, UpdateScheduleDto,
            UpdateShiftDto, UpsertScheduleDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::schedule::ScheduleService,
        state::AppState,
    },
};

/// Tag for grouping shift and schedule endpoints in OpenAPI documentation
pub static SCHEDULE_TAG: &str = "schedule";

/// List global shifts and the shifts of viewable departments.
#[utoipa::path(
    get,
    path = "/api/shifts",
    tag = SCHEDULE_TAG,
    responses(
        (status = 200, description = "Visible shifts", body = ApiResponse<Vec<ShiftDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_shifts(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let shifts = ScheduleService::new(&state.db).list_shifts(&current).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(shifts))))
}

#[utoipa::path(
    post,
    path = "/api/shifts",
    tag = SCHEDULE_TAG,
    request_body = CreateShiftDto,
    responses(
        (status = 201, description = "Shift created", body = ApiResponse<ShiftDto>),
        (status = 400, description = "Invalid shift", body = ErrorDto),
        (status = 403, description = "Missing schedule:manage", body = ErrorDto)
    ),
)]
pub async fn create_shift(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateShiftDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let shift = ScheduleService::new(&state.db)
        .create_shift(&current, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(shift))))
}

#[utoipa::path(
    put,
    path = "/api/shifts/{id}",
    tag = SCHEDULE_TAG,
    params(("id" = i32, Path, description = "Shift ID")),
    request_body = UpdateShiftDto,
    responses(
        (status = 200, description = "Shift updated", body = ApiResponse<ShiftDto>),
        (status = 400, description = "Invalid shift", body = ErrorDto),
        (status = 404, description = "Shift not found", body = ErrorDto)
    ),
)]
pub async fn update_shift(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateShiftDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let shift = ScheduleService::new(&state.db)
        .update_shift(&current, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(shift))))
}

#[utoipa::path(
    delete,
    path = "/api/shifts/{id}",
    tag = SCHEDULE_TAG,
    params(("id" = i32, Path, description = "Shift ID")),
    responses(
        (status = 200, description = "Shift deleted", body = MessageDto),
        (status = 400, description = "Shift still scheduled", body = ErrorDto),
        (status = 404, description = "Shift not found", body = ErrorDto)
    ),
)]
pub async fn delete_shift(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    ScheduleService::new(&state.db)
        .delete_shift(&current, id)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Shift deleted"))))
}

/// List schedule rows of a date range of at most 93 days.
#[utoipa::path(
    get,
    path = "/api/schedules",
    tag = SCHEDULE_TAG,
    params(ScheduleQueryDto),
    responses(
        (status = 200, description = "Schedule rows in scope", body = ApiResponse<Vec<ScheduleDto>>),
        (status = 400, description = "Invalid range", body = ErrorDto)
    ),
)]
pub async fn list_schedules(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ScheduleQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let schedules = ScheduleService::new(&state.db).list(&current, query).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(schedules))))
}

/// Set the shift of one employee on one date, replacing any existing row.
#[utoipa::path(
    post,
    path = "/api/schedules",
    tag = SCHEDULE_TAG,
    request_body = UpsertScheduleDto,
    responses(
        (status = 200, description = "Schedule row stored", body = ApiResponse<ScheduleDto>),
        (status = 400, description = "Invalid schedule", body = ErrorDto),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto)
    ),
)]
pub async fn upsert_schedule(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<UpsertScheduleDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let schedule = ScheduleService::new(&state.db)
        .upsert(&current, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(schedule))))
}

#[utoipa::path(
    post,
    path = "/api/schedules/batch",
    tag = SCHEDULE_TAG,
    request_body = BatchScheduleDto,
    responses(
        (status = 200, description = "Schedule rows stored", body = ApiResponse<Vec<ScheduleDto>>),
        (status = 400, description = "Invalid entry", body = ErrorDto),
        (status = 403, description = "Employee outside the viewable set", body = ErrorDto)
    ),
)]
pub async fn batch_upsert_schedules(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BatchScheduleDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let schedules = ScheduleService::new(&state.db)
        .batch_upsert(&current, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(schedules))))
}

#[utoipa::path(
    put,
    path = "/api/schedules/{id}",
    tag = SCHEDULE_TAG,
    params(("id" = i32, Path, description = "Schedule row ID")),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Schedule row updated", body = ApiResponse<ScheduleDto>),
        (status = 400, description = "Invalid schedule", body = ErrorDto),
        (status = 404, description = "Schedule row not found", body = ErrorDto)
    ),
)]
pub async fn update_schedule(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateScheduleDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let schedule = ScheduleService::new(&state.db)
        .update(&current, id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(schedule))))
}

#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    tag = SCHEDULE_TAG,
    params(("id" = i32, Path, description = "Schedule row ID")),
    responses(
        (status = 200, description = "Schedule row deleted", body = MessageDto),
        (status = 404, description = "Schedule row not found", body = ErrorDto)
    ),
)]
pub async fn delete_schedule(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    ScheduleService::new(&state.db).delete(&current, id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Schedule deleted"))))
}

#[utoipa::path(
    post,
    path = "/api/schedules/batch-delete",
    tag = SCHEDULE_TAG,
    request_body = BatchDeleteDto,
    responses(
        (status = 200, description = "Number of deleted rows", body = ApiResponse<CountDto>),
        (status = 403, description = "Row outside the viewable set", body = ErrorDto)
    ),
)]
pub async fn batch_delete_schedules(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BatchDeleteDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let count = ScheduleService::new(&state.db)
        .batch_delete(&current, &payload.ids)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(CountDto { count }))))
}

/// Copy a date range onto another start date. Existing target rows are kept.
#[utoipa::path(
    post,
    path = "/api/schedules/copy",
    tag = SCHEDULE_TAG,
    request_body = CopySchedulesDto,
    responses(
        (status = 200, description = "Created and skipped counts", body = ApiResponse<CopySchedulesResultDto>),
        (status = 400, description = "Invalid range or zero offset", body = ErrorDto),
        (status = 403, description = "Missing schedule:manage", body = ErrorDto)
    ),
)]
pub async fn copy_schedules(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CopySchedulesDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ScheduleManage])
        .await?;

    let result = ScheduleService::new(&state.db)
        .copy(&current, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(result))))
}

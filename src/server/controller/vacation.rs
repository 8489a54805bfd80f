//! Vacation types, statutory holiday entries and overtime conversion rules.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, MessageDto},
        vacation::{
            ConversionRuleDto, ConversionRuleFilterDto, CreateConversionRuleDto,
            CreateHolidayDto, CreateVacationTypeDto, HolidayDto, HolidayMonthSummaryDto,
            UpdateConversionRuleDto, UpdateHolidayDto, UpdateVacationTypeDto, VacationTypeDto,
            YearQueryDto,
        },
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::vacation::VacationService,
        state::AppState,
        util::time::current_year,
    },
};

/// Tag for grouping vacation configuration endpoints in OpenAPI documentation
pub static VACATION_TAG: &str = "vacation";

#[utoipa::path(
    get,
    path = "/api/vacation-types",
    tag = VACATION_TAG,
    responses(
        (status = 200, description = "All vacation types", body = ApiResponse<Vec<VacationTypeDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_vacation_types(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let types = VacationService::new(&state.db).list_types().await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(types))))
}

#[utoipa::path(
    post,
    path = "/api/vacation-types",
    tag = VACATION_TAG,
    request_body = CreateVacationTypeDto,
    responses(
        (status = 201, description = "Vacation type created", body = ApiResponse<VacationTypeDto>),
        (status = 400, description = "Invalid data or duplicate code", body = ErrorDto),
        (status = 403, description = "Missing vacation:manage", body = ErrorDto)
    ),
)]
pub async fn create_vacation_type(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateVacationTypeDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let vacation_type = VacationService::new(&state.db).create_type(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(vacation_type))))
}

#[utoipa::path(
    put,
    path = "/api/vacation-types/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Vacation type ID")),
    request_body = UpdateVacationTypeDto,
    responses(
        (status = 200, description = "Vacation type updated", body = ApiResponse<VacationTypeDto>),
        (status = 400, description = "Invalid data", body = ErrorDto),
        (status = 404, description = "Vacation type not found", body = ErrorDto)
    ),
)]
pub async fn update_vacation_type(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateVacationTypeDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let vacation_type = VacationService::new(&state.db)
        .update_type(id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(vacation_type))))
}

/// Delete a vacation type that no holiday, balance or leave record uses.
#[utoipa::path(
    delete,
    path = "/api/vacation-types/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Vacation type ID")),
    responses(
        (status = 200, description = "Vacation type deleted", body = MessageDto),
        (status = 400, description = "Vacation type still referenced", body = ErrorDto),
        (status = 404, description = "Vacation type not found", body = ErrorDto)
    ),
)]
pub async fn delete_vacation_type(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    VacationService::new(&state.db).delete_type(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Vacation type deleted"))))
}

/// List holiday entries of a year (defaults to the current year).
#[utoipa::path(
    get,
    path = "/api/holidays",
    tag = VACATION_TAG,
    params(YearQueryDto),
    responses(
        (status = 200, description = "Holiday entries", body = ApiResponse<Vec<HolidayDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_holidays(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<YearQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let year = query.year.unwrap_or_else(|| current_year(state.utc_offset));
    let holidays = VacationService::new(&state.db).list_holidays(year).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(holidays))))
}

/// Per-month totals of a year; always twelve rows.
#[utoipa::path(
    get,
    path = "/api/holidays/summary",
    tag = VACATION_TAG,
    params(YearQueryDto),
    responses(
        (status = 200, description = "Monthly summary", body = ApiResponse<Vec<HolidayMonthSummaryDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn holiday_summary(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<YearQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let year = query.year.unwrap_or_else(|| current_year(state.utc_offset));
    let summary = VacationService::new(&state.db).holiday_summary(year).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(summary))))
}

#[utoipa::path(
    post,
    path = "/api/holidays",
    tag = VACATION_TAG,
    request_body = CreateHolidayDto,
    responses(
        (status = 201, description = "Holiday entry created", body = ApiResponse<HolidayDto>),
        (status = 400, description = "Invalid data", body = ErrorDto),
        (status = 403, description = "Missing vacation:manage", body = ErrorDto)
    ),
)]
pub async fn create_holiday(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateHolidayDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let holiday = VacationService::new(&state.db).create_holiday(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(holiday))))
}

#[utoipa::path(
    put,
    path = "/api/holidays/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Holiday entry ID")),
    request_body = UpdateHolidayDto,
    responses(
        (status = 200, description = "Holiday entry updated", body = ApiResponse<HolidayDto>),
        (status = 400, description = "Invalid data or no fields supplied", body = ErrorDto),
        (status = 404, description = "Holiday entry not found", body = ErrorDto)
    ),
)]
pub async fn update_holiday(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateHolidayDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let holiday = VacationService::new(&state.db)
        .update_holiday(id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(holiday))))
}

#[utoipa::path(
    delete,
    path = "/api/holidays/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Holiday entry ID")),
    responses(
        (status = 200, description = "Holiday entry deleted", body = MessageDto),
        (status = 404, description = "Holiday entry not found", body = ErrorDto)
    ),
)]
pub async fn delete_holiday(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    VacationService::new(&state.db).delete_holiday(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Holiday entry deleted"))))
}

#[utoipa::path(
    get,
    path = "/api/conversion-rules",
    tag = VACATION_TAG,
    params(ConversionRuleFilterDto),
    responses(
        (status = 200, description = "Conversion rules", body = ApiResponse<Vec<ConversionRuleDto>>),
        (status = 401, description = "Not logged in", body = ErrorDto)
    ),
)]
pub async fn list_conversion_rules(
    State(state): State<AppState>,
    session: Session,
    Query(filter): Query<ConversionRuleFilterDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let rules = VacationService::new(&state.db)
        .list_rules(filter.enabled)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(rules))))
}

#[utoipa::path(
    get,
    path = "/api/conversion-rules/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Conversion rule ID")),
    responses(
        (status = 200, description = "The rule", body = ApiResponse<ConversionRuleDto>),
        (status = 404, description = "Conversion rule not found", body = ErrorDto)
    ),
)]
pub async fn get_conversion_rule(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let rule = VacationService::new(&state.db).get_rule(id).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(rule))))
}

/// Create a rule. An enabled rule disables every other rule.
#[utoipa::path(
    post,
    path = "/api/conversion-rules",
    tag = VACATION_TAG,
    request_body = CreateConversionRuleDto,
    responses(
        (status = 201, description = "Conversion rule created", body = ApiResponse<ConversionRuleDto>),
        (status = 400, description = "Invalid rule", body = ErrorDto),
        (status = 403, description = "Missing vacation:manage", body = ErrorDto)
    ),
)]
pub async fn create_conversion_rule(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<CreateConversionRuleDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let rule = VacationService::new(&state.db).create_rule(payload).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(rule))))
}

#[utoipa::path(
    put,
    path = "/api/conversion-rules/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Conversion rule ID")),
    request_body = UpdateConversionRuleDto,
    responses(
        (status = 200, description = "Conversion rule updated", body = ApiResponse<ConversionRuleDto>),
        (status = 400, description = "Invalid rule", body = ErrorDto),
        (status = 404, description = "Conversion rule not found", body = ErrorDto)
    ),
)]
pub async fn update_conversion_rule(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateConversionRuleDto>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    let rule = VacationService::new(&state.db)
        .update_rule(id, payload)
        .await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(rule))))
}

#[utoipa::path(
    delete,
    path = "/api/conversion-rules/{id}",
    tag = VACATION_TAG,
    params(("id" = i32, Path, description = "Conversion rule ID")),
    responses(
        (status = 200, description = "Conversion rule deleted", body = MessageDto),
        (status = 404, description = "Conversion rule not found", body = ErrorDto)
    ),
)]
pub async fn delete_conversion_rule(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let _ = AuthGuard::new(&state.db, &session)
        .require(&[Permission::VacationManage])
        .await?;

    VacationService::new(&state.db).delete_rule(id).await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Conversion rule deleted"))))
}

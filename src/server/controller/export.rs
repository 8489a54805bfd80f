use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::ErrorDto,
        export::{BalanceExportQueryDto, EmployeeExportQueryDto, ScheduleExportQueryDto},
    },
    server::{
        error::AppError,
        middleware::auth::{AuthGuard, Permission},
        service::export::{attachment_name, ExportService, XLSX_CONTENT_TYPE},
        state::AppState,
        util::time::current_year,
    },
};

/// Tag for grouping export endpoints in OpenAPI documentation
pub static EXPORT_TAG: &str = "export";

fn xlsx_response(file_name: String, bytes: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        bytes,
    )
}

/// Download the shift grid of a date range (at most 93 days).
#[utoipa::path(
    get,
    path = "/api/export/schedules",
    tag = EXPORT_TAG,
    params(ScheduleExportQueryDto),
    responses(
        (status = 200, description = "Workbook with one row per employee", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Invalid date range", body = ErrorDto),
        (status = 403, description = "Missing export:data", body = ErrorDto)
    ),
)]
pub async fn export_schedules(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ScheduleExportQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ExportData])
        .await?;

    let file_name = attachment_name(
        "schedules",
        &format!("{}_{}", query.start_date, query.end_date),
    );
    let bytes = ExportService::new(&state.db)
        .schedules(&current, query)
        .await?;

    Ok(xlsx_response(file_name, bytes))
}

#[utoipa::path(
    get,
    path = "/api/export/vacation-balances",
    tag = EXPORT_TAG,
    params(BalanceExportQueryDto),
    responses(
        (status = 200, description = "Workbook with one row per balance", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Missing export:data", body = ErrorDto)
    ),
)]
pub async fn export_vacation_balances(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<BalanceExportQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ExportData])
        .await?;

    let year = query.year.unwrap_or_else(|| current_year(state.utc_offset));
    let bytes = ExportService::new(&state.db)
        .vacation_balances(&current, query.department_id, year)
        .await?;

    Ok(xlsx_response(
        attachment_name("vacation_balances", &year.to_string()),
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/api/export/employees",
    tag = EXPORT_TAG,
    params(EmployeeExportQueryDto),
    responses(
        (status = 200, description = "Employee roster workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 403, description = "Missing export:data", body = ErrorDto)
    ),
)]
pub async fn export_employees(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<EmployeeExportQueryDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session)
        .require(&[Permission::ExportData])
        .await?;

    let bytes = ExportService::new(&state.db)
        .employees_roster(&current, query)
        .await?;
    let today = crate::server::util::time::today(state.utc_offset);

    Ok(xlsx_response(
        attachment_name("employees", &today.to_string()),
        bytes,
    ))
}

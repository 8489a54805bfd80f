//! HTTP routing and API documentation.
//!
//! Every handler is registered through `routes!` so its `#[utoipa::path]` annotation
//! lands in the generated OpenAPI document served at `/api/docs`.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{
    config::Config,
    controller::{
        assessment, attendance, auth, balance, broadcast, chat, clock, department, employee,
        export, inventory, memo, notification, reimbursement, role, schedule, vacation, ws,
    },
    error::{config::ConfigError, AppError},
    state::AppState,
};

/// Requests per second replenished for each peer on the credential endpoints.
const AUTH_RATE_PER_SECOND: u64 = 1;
const AUTH_RATE_BURST: u32 = 5;

#[derive(OpenApi)]
#[openapi(
    info(title = "hrdesk", description = "HR and office management API"),
    tags(
        (name = "auth", description = "Login, session and password"),
        (name = "role", description = "Permissions and roles"),
        (name = "department", description = "Department tree"),
        (name = "employee", description = "Employee records"),
        (name = "vacation", description = "Vacation types, holidays and conversion rules"),
        (name = "balance", description = "Vacation balance ledger"),
        (name = "attendance", description = "Overtime and leave requests"),
        (name = "clock", description = "Daily clock-in and attendance records"),
        (name = "schedule", description = "Shifts and schedules"),
        (name = "assessment", description = "Exams and assessment plans"),
        (name = "notification", description = "Personal notifications"),
        (name = "broadcast", description = "Broadcast messages"),
        (name = "chat", description = "Group chat"),
        (name = "memo", description = "Personal and department memos"),
        (name = "realtime", description = "WebSocket push channel"),
        (name = "export", description = "Spreadsheet exports"),
        (name = "reimbursement", description = "Expense claims and their approval"),
        (name = "inventory", description = "Office supplies and stock"),
    )
)]
struct ApiDoc;

/// Builds the application router without state or session layer.
pub fn router(config: &Config) -> Result<Router<AppState>, AppError> {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(credential_routes()?)
        .merge(auth_routes())
        .merge(organisation_routes())
        .merge(vacation_routes())
        .merge(attendance_routes())
        .merge(assessment_routes())
        .merge(messaging_routes())
        .routes(routes!(ws::connect))
        .merge(export_routes())
        .merge(office_routes())
        .split_for_parts();

    Ok(router
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(cors_layer(config)?))
}

/// Login and bootstrap, rate limited per peer IP.
fn credential_routes() -> Result<OpenApiRouter<AppState>, AppError> {
    let governor = GovernorConfigBuilder::default()
        .per_second(AUTH_RATE_PER_SECOND)
        .burst_size(AUTH_RATE_BURST)
        .finish()
        .ok_or_else(|| AppError::InternalError("invalid rate limit configuration".to_string()))?;

    Ok(OpenApiRouter::new()
        .routes(routes!(auth::login))
        .routes(routes!(auth::bootstrap))
        .layer(GovernorLayer::new(Arc::new(governor))))
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(auth::logout))
        .routes(routes!(auth::me))
        .routes(routes!(auth::change_password))
}

fn organisation_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(role::list_permissions))
        .routes(routes!(role::list_roles, role::create_role))
        .routes(routes!(role::get_role, role::update_role, role::delete_role))
        .routes(routes!(role::assign_roles))
        .routes(routes!(
            department::list_departments,
            department::create_department
        ))
        .routes(routes!(department::list_all_departments))
        .routes(routes!(
            department::get_department,
            department::update_department,
            department::delete_department
        ))
        .routes(routes!(department::department_employees))
        .routes(routes!(employee::list_employees, employee::create_employee))
        .routes(routes!(employee::get_employee, employee::update_employee))
}

fn vacation_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            vacation::list_vacation_types,
            vacation::create_vacation_type
        ))
        .routes(routes!(
            vacation::update_vacation_type,
            vacation::delete_vacation_type
        ))
        .routes(routes!(vacation::list_holidays, vacation::create_holiday))
        .routes(routes!(vacation::holiday_summary))
        .routes(routes!(vacation::update_holiday, vacation::delete_holiday))
        .routes(routes!(
            vacation::list_conversion_rules,
            vacation::create_conversion_rule
        ))
        .routes(routes!(
            vacation::get_conversion_rule,
            vacation::update_conversion_rule,
            vacation::delete_conversion_rule
        ))
        .routes(routes!(balance::balance_overview))
        .routes(routes!(balance::employee_balances))
        .routes(routes!(balance::adjust_balance))
        .routes(routes!(balance::batch_adjust_balances))
        .routes(routes!(balance::balance_history))
        .routes(routes!(balance::convert_overtime))
        .routes(routes!(balance::list_conversions))
        .routes(routes!(balance::available_overtime))
}

fn attendance_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(attendance::apply_overtime))
        .routes(routes!(attendance::list_overtime))
        .routes(routes!(attendance::approve_overtime))
        .routes(routes!(attendance::reject_overtime))
        .routes(routes!(attendance::overtime_stats))
        .routes(routes!(attendance::apply_leave))
        .routes(routes!(attendance::list_leave))
        .routes(routes!(attendance::pending_leave))
        .routes(routes!(attendance::approve_leave))
        .routes(routes!(attendance::reject_leave))
        .routes(routes!(attendance::cancel_leave))
        .routes(routes!(clock::clock_in))
        .routes(routes!(clock::clock_out))
        .routes(routes!(clock::today))
        .routes(routes!(clock::records))
        .routes(routes!(schedule::list_shifts, schedule::create_shift))
        .routes(routes!(schedule::update_shift, schedule::delete_shift))
        .routes(routes!(schedule::list_schedules, schedule::upsert_schedule))
        .routes(routes!(schedule::batch_upsert_schedules))
        .routes(routes!(schedule::update_schedule, schedule::delete_schedule))
        .routes(routes!(schedule::batch_delete_schedules))
        .routes(routes!(schedule::copy_schedules))
}

fn assessment_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(assessment::list_exams, assessment::create_exam))
        .routes(routes!(
            assessment::get_exam,
            assessment::update_exam,
            assessment::delete_exam
        ))
        .routes(routes!(assessment::set_exam_status))
        .routes(routes!(assessment::list_plans, assessment::create_plan))
        .routes(routes!(assessment::my_plans))
        .routes(routes!(
            assessment::get_plan,
            assessment::update_plan,
            assessment::delete_plan
        ))
        .routes(routes!(assessment::plan_participants))
        .routes(routes!(assessment::start_attempt))
        .routes(routes!(assessment::submit_attempt))
        .routes(routes!(assessment::grade_attempt))
}

fn messaging_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(notification::list_notifications))
        .routes(routes!(notification::unread_count))
        .routes(routes!(notification::mark_read))
        .routes(routes!(notification::mark_all_read))
        .routes(routes!(notification::delete_notification))
        .routes(routes!(notification::notification_stats))
        .routes(routes!(notification::cleanup_notifications))
        .routes(routes!(
            broadcast::sent_broadcasts,
            broadcast::create_broadcast
        ))
        .routes(routes!(broadcast::received_broadcasts))
        .routes(routes!(broadcast::mark_broadcast_read))
        .routes(routes!(broadcast::delete_broadcast))
        .routes(routes!(broadcast::broadcast_recipients))
        .routes(routes!(chat::list_groups, chat::create_group))
        .routes(routes!(chat::list_members, chat::add_members))
        .routes(routes!(chat::remove_member))
        .routes(routes!(chat::list_messages, chat::send_message))
        .routes(routes!(chat::mark_group_read))
        .routes(routes!(chat::mute_group))
        .routes(routes!(chat::chat_unread_count))
        .routes(routes!(memo::create_personal_memo))
        .routes(routes!(
            memo::update_personal_memo,
            memo::delete_personal_memo
        ))
        .routes(routes!(memo::my_memos))
        .routes(routes!(memo::memo_unread_count))
        .routes(routes!(memo::mark_memo_read))
        .routes(routes!(memo::create_department_memo))
        .routes(routes!(memo::sent_department_memos))
        .routes(routes!(memo::department_memo_recipients))
}

fn export_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(export::export_schedules))
        .routes(routes!(export::export_vacation_balances))
        .routes(routes!(export::export_employees))
}

fn office_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(reimbursement::create_reimbursement))
        .routes(routes!(reimbursement::my_reimbursements))
        .routes(routes!(reimbursement::pending_reimbursements))
        .routes(routes!(
            reimbursement::get_reimbursement,
            reimbursement::update_reimbursement,
            reimbursement::delete_reimbursement
        ))
        .routes(routes!(reimbursement::submit_reimbursement))
        .routes(routes!(reimbursement::cancel_reimbursement))
        .routes(routes!(reimbursement::decide_reimbursement))
        .routes(routes!(inventory::list_items, inventory::create_item))
        .routes(routes!(inventory::procure))
        .routes(routes!(inventory::use_items))
        .routes(routes!(inventory::audit))
        .routes(routes!(inventory::procurement_history))
        .routes(routes!(inventory::usage_history))
        .routes(routes!(inventory::audit_history))
        .routes(routes!(inventory::stock_history))
}

/// Any origin without credentials when `CORS_ORIGIN` is unset, otherwise that origin
/// with cookies allowed.
fn cors_layer(config: &Config) -> Result<CorsLayer, AppError> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let Some(origin) = &config.cors_origin else {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE]));
    };

    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ConfigError::InvalidEnvVar("CORS_ORIGIN".to_string(), origin.clone()))?;

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(methods)
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true))
}

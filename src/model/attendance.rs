use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ApplyOvertimeDto {
    /// Defaults to the caller's own employee record.
    pub employee_id: Option<i32>,
    pub overtime_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub reason: String,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct OvertimeDto {
    pub id: i32,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub overtime_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub hours: f64,
    pub reason: String,
    /// `pending`, `approved` or `rejected`.
    pub status: String,
    pub approver_id: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approval_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct ApprovalDto {
    pub approval_note: Option<String>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct AttendanceFilterDto {
    pub employee_id: Option<i32>,
    pub status: Option<String>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct OvertimeStatsQueryDto {
    pub employee_id: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct OvertimeStatsDto {
    pub employee_id: i32,
    pub year: i32,
    pub approved_hours: f64,
    pub pending_hours: f64,
    pub approved_count: u64,
    pub pending_count: u64,
    pub rejected_count: u64,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ApplyLeaveDto {
    /// Defaults to the caller's own employee record.
    pub employee_id: Option<i32>,
    pub vacation_type_id: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct LeaveDto {
    pub id: i32,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub vacation_type_id: i32,
    pub vacation_type_name: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: f64,
    pub reason: Option<String>,
    /// `pending`, `approved`, `rejected` or `cancelled`.
    pub status: String,
    pub approver_id: Option<i32>,
    pub approved_at: Option<DateTime<Utc>>,
    pub approval_note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct PendingLeaveQueryDto {
    pub department_id: Option<i32>,
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ShiftDto {
    pub id: i32,
    pub name: String,
    /// `HH:MM`.
    pub start_time: String,
    /// `HH:MM`.
    pub end_time: String,
    pub color: String,
    pub is_rest: bool,
    pub department_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateShiftDto {
    pub name: String,
    pub start_time: String,
    pub end_time: String,
    pub color: Option<String>,
    #[serde(default)]
    pub is_rest: bool,
    pub department_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateShiftDto {
    pub name: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub color: Option<String>,
    pub is_rest: Option<bool>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ScheduleDto {
    pub id: i32,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub department_id: Option<i32>,
    pub schedule_date: NaiveDate,
    pub shift_id: i32,
    pub shift_name: Option<String>,
    pub shift_color: Option<String>,
    pub is_rest_day: bool,
    pub note: Option<String>,
}

#[derive(Deserialize, IntoParams, Clone, Debug)]
#[into_params(parameter_in = Query)]
pub struct ScheduleQueryDto {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub department_id: Option<i32>,
    pub employee_id: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct UpsertScheduleDto {
    pub employee_id: i32,
    pub schedule_date: NaiveDate,
    pub shift_id: i32,
    pub note: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct BatchScheduleDto {
    pub entries: Vec<UpsertScheduleDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateScheduleDto {
    pub shift_id: Option<i32>,
    pub note: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct BatchDeleteDto {
    pub ids: Vec<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CopySchedulesDto {
    pub source_start: NaiveDate,
    pub source_end: NaiveDate,
    pub target_start: NaiveDate,
    pub employee_ids: Option<Vec<i32>>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct CopySchedulesResultDto {
    pub created: u64,
    pub skipped: u64,
}

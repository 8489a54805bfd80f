use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::api::PageDto;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ClockRecordDto {
    pub id: i32,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub record_date: NaiveDate,
    pub clock_in_time: Option<DateTime<Utc>>,
    pub clock_out_time: Option<DateTime<Utc>>,
    pub work_hours: Option<f64>,
    /// `normal`, `late` or `early`.
    pub status: String,
}

/// Outcome of a clock-in or clock-out.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ClockResultDto {
    pub record: ClockRecordDto,
    /// Minutes past the shift start, set when the clock-in counted as late.
    pub late_minutes: Option<i64>,
    /// Minutes before the shift end, set when the clock-out counted as early.
    pub early_minutes: Option<i64>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ClockTodayQueryDto {
    /// Defaults to the caller's own employee record.
    pub employee_id: Option<i32>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ClockRecordsQueryDto {
    /// Defaults to the caller's own employee record.
    pub employee_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// `normal`, `late` or `early`; filters the page but not the statistics.
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ClockStatsDto {
    /// Clock records plus approved leave and overtime entries in the range.
    pub total_days: u64,
    pub normal_count: u64,
    pub late_count: u64,
    pub early_count: u64,
    pub leave_count: u64,
    pub overtime_count: u64,
    /// Clocked hours plus approved overtime hours.
    pub total_work_hours: f64,
    pub avg_work_hours: f64,
    /// Percentage of clock records with status `normal`, one decimal.
    pub attendance_rate: f64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ClockRecordsDto {
    pub records: PageDto<ClockRecordDto>,
    pub stats: ClockStatsDto,
}

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams, Clone, Debug)]
#[into_params(parameter_in = Query)]
pub struct ScheduleExportQueryDto {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub department_id: Option<i32>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct BalanceExportQueryDto {
    /// Defaults to the current year.
    pub year: Option<i32>,
    pub department_id: Option<i32>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct EmployeeExportQueryDto {
    pub department_id: Option<i32>,
}

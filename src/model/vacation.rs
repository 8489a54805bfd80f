use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct VacationTypeDto {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateVacationTypeDto {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    /// Defaults to the current maximum plus one.
    pub sort_order: Option<i32>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateVacationTypeDto {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub enabled: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct HolidayDto {
    pub id: i32,
    pub name: String,
    pub days: i32,
    pub month: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    pub vacation_type_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateHolidayDto {
    pub name: String,
    pub days: i32,
    pub month: i32,
    pub year: i32,
    pub vacation_type_id: i32,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateHolidayDto {
    pub name: Option<String>,
    pub days: Option<i32>,
    pub month: Option<i32>,
    pub year: Option<i32>,
    pub vacation_type_id: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct HolidayMonthSummaryDto {
    pub month: i32,
    pub total_days: i64,
    pub count: u64,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct YearQueryDto {
    /// Defaults to the current year.
    pub year: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ConversionRuleDto {
    pub id: i32,
    pub name: String,
    pub source_type: String,
    /// Vacation type code credited by the rule.
    pub target_type: String,
    pub ratio: f64,
    pub enabled: bool,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateConversionRuleDto {
    pub name: String,
    pub source_type: Option<String>,
    pub target_type: String,
    pub ratio: f64,
    pub enabled: Option<bool>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateConversionRuleDto {
    pub name: Option<String>,
    pub target_type: Option<String>,
    pub ratio: Option<f64>,
    pub enabled: Option<bool>,
    pub description: Option<String>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ConversionRuleFilterDto {
    pub enabled: Option<bool>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct BalanceDto {
    pub id: i32,
    pub employee_id: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    pub vacation_type_code: String,
    pub vacation_type_name: String,
    pub total_days: f64,
    pub converted_days: f64,
    pub adjusted_days: f64,
    pub used_days: f64,
    /// `total + converted + adjusted - used`.
    pub remaining_days: f64,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct EmployeeBalancesDto {
    pub employee_id: i32,
    pub employee_no: String,
    pub real_name: String,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
    pub balances: Vec<BalanceDto>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct BalanceOverviewQueryDto {
    pub year: Option<i32>,
    pub department_id: Option<i32>,
    pub keyword: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AdjustMode {
    /// Make the remaining balance equal to `days`.
    Set,
    Increase,
    Decrease,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct AdjustBalanceDto {
    pub year: i32,
    pub vacation_type_id: i32,
    pub mode: AdjustMode,
    pub days: f64,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct BatchAdjustBalanceDto {
    pub employee_ids: Vec<i32>,
    pub year: i32,
    pub vacation_type_id: i32,
    pub mode: AdjustMode,
    pub days: f64,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct AuditLogDto {
    pub id: i32,
    pub employee_id: i32,
    pub balance_id: i32,
    pub year: i32,
    pub vacation_type_id: i32,
    /// `adjust`, `batch_adjust`, `deduct`, `convert` or `statutory_sync`.
    pub operation: String,
    pub change_days: f64,
    pub before_snapshot: Option<serde_json::Value>,
    pub after_snapshot: Option<serde_json::Value>,
    pub reason: Option<String>,
    pub operator_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ConvertOvertimeDto {
    pub employee_id: i32,
    pub overtime_hours: f64,
    pub target_type_id: i32,
    pub conversion_rule_id: Option<i32>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct OvertimeConversionDto {
    pub id: i32,
    pub employee_id: i32,
    pub year: i32,
    pub overtime_hours: f64,
    pub vacation_type_id: i32,
    pub converted_days: f64,
    pub conversion_rule_id: Option<i32>,
    pub conversion_ratio: f64,
    pub created_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct AvailableOvertimeDto {
    pub employee_id: i32,
    pub approved_hours: f64,
    pub converted_hours: f64,
    pub available_hours: f64,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ConversionHistoryQueryDto {
    pub employee_id: Option<i32>,
}

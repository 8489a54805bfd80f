use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// An employee record joined with its user account.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct EmployeeDto {
    pub id: i32,
    pub user_id: i32,
    pub employee_no: String,
    pub username: String,
    pub real_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
    pub department_name: Option<String>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    /// `active` or `resigned`.
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateEmployeeDto {
    pub username: String,
    pub password: String,
    pub real_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
    pub employee_no: String,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

/// Partial update; omitted fields are left unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateEmployeeDto {
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilterDto {
    /// Matches real name, employee number or username.
    pub keyword: Option<String>,
    pub department_id: Option<i32>,
    pub status: Option<String>,
}

//! Employee domain model and parameters.
//!
//! An employee is the HR half of a person; the login half lives in `user`. The domain
//! model joins both plus the department name for display.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::employee::{CreateEmployeeDto, EmployeeDto, EmployeeFilterDto, UpdateEmployeeDto};

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
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
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Employee {
    /// Joins an employee row with its user and (optional) department.
    pub fn from_entities(
        employee: entity::employee::Model,
        user: entity::user::Model,
        department: Option<entity::department::Model>,
    ) -> Self {
        Self {
            id: employee.id,
            user_id: user.id,
            employee_no: employee.employee_no,
            username: user.username,
            real_name: user.real_name,
            email: user.email,
            phone: user.phone,
            department_id: user.department_id,
            department_name: department.map(|d| d.name),
            position: employee.position,
            hire_date: employee.hire_date,
            status: employee.status,
            created_at: employee.created_at,
        }
    }

    pub fn into_dto(self) -> EmployeeDto {
        EmployeeDto {
            id: self.id,
            user_id: self.user_id,
            employee_no: self.employee_no,
            username: self.username,
            real_name: self.real_name,
            email: self.email,
            phone: self.phone,
            department_id: self.department_id,
            department_name: self.department_name,
            position: self.position,
            hire_date: self.hire_date,
            status: self.status,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateEmployeeParams {
    pub username: String,
    pub password_hash: String,
    pub real_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
    pub employee_no: String,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

impl CreateEmployeeParams {
    /// Converts the request, storing `password_hash` in place of the plain password.
    pub fn from_dto(dto: CreateEmployeeDto, password_hash: String) -> Self {
        Self {
            username: dto.username.trim().to_string(),
            password_hash,
            real_name: dto.real_name.trim().to_string(),
            email: dto.email,
            phone: dto.phone,
            department_id: dto.department_id,
            employee_no: dto.employee_no.trim().to_string(),
            position: dto.position,
            hire_date: dto.hire_date,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateEmployeeParams {
    pub real_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
    pub position: Option<String>,
    pub hire_date: Option<NaiveDate>,
    pub status: Option<String>,
}

impl UpdateEmployeeParams {
    pub fn from_dto(dto: UpdateEmployeeDto) -> Self {
        Self {
            real_name: dto.real_name,
            email: dto.email,
            phone: dto.phone,
            department_id: dto.department_id,
            position: dto.position,
            hire_date: dto.hire_date,
            status: dto.status,
        }
    }
}

/// Employee list filter after scope narrowing.
#[derive(Debug, Clone, Default)]
pub struct EmployeeFilter {
    pub keyword: Option<String>,
    /// `None` means unrestricted, an empty list matches nothing.
    pub department_ids: Option<Vec<i32>>,
    pub status: Option<String>,
}

impl EmployeeFilter {
    pub fn from_dto(dto: EmployeeFilterDto, department_ids: Option<Vec<i32>>) -> Self {
        Self {
            keyword: dto.keyword.filter(|k| !k.trim().is_empty()),
            department_ids,
            status: dto.status,
        }
    }
}

/// A new login account.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub password_hash: String,
    pub real_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
}

//! Employee records and the scope helpers other services reuse to filter rows by
//! department.

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        employee::{CreateEmployeeDto, EmployeeDto, EmployeeFilterDto, UpdateEmployeeDto},
    },
    server::{
        data::{
            department::DepartmentRepository, employee::EmployeeRepository, user::UserRepository,
        },
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::employee::{
            CreateEmployeeParams, CreateUserParams, Employee, EmployeeFilter, UpdateEmployeeParams,
        },
        service::auth::validate_password,
        util::{
            password::hash_password,
            validate::{optional_text, required_text},
        },
    },
};

const EMPLOYEE_STATUSES: [&str; 2] = ["active", "resigned"];

/// Employee ids visible to `current`.
///
/// `None` means unrestricted. Otherwise the employees of the viewable departments plus
/// the caller's own employee record.
pub async fn visible_employee_ids<C: ConnectionTrait>(
    db: &C,
    current: &CurrentUser,
) -> Result<Option<Vec<i32>>, AppError> {
    let Some(department_ids) = current.scope.department_ids() else {
        return Ok(None);
    };

    let repo = EmployeeRepository::new(db);
    let mut ids = repo.ids_in_departments(&department_ids).await?;
    if let Some(own) = repo.find_by_user_id(current.id()).await? {
        if !ids.contains(&own.id) {
            ids.push(own.id);
        }
    }

    Ok(Some(ids))
}

/// Fails with 403 unless the employee's department is viewable or it is the caller.
pub async fn require_employee_visible<C: ConnectionTrait>(
    db: &C,
    current: &CurrentUser,
    employee_id: i32,
) -> Result<Employee, AppError> {
    let employee = EmployeeRepository::new(db)
        .find_by_id(employee_id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee not found"))?;

    current.require_visible(employee.department_id, employee.user_id)?;

    Ok(employee)
}

/// Fails with 400 when an id does not exist and 403 when one is outside the scope.
pub async fn require_employees_visible<C: ConnectionTrait>(
    db: &C,
    current: &CurrentUser,
    employee_ids: &[i32],
) -> Result<(), AppError> {
    let existing = EmployeeRepository::new(db).existing_ids(employee_ids).await?;
    if let Some(missing) = employee_ids.iter().find(|id| !existing.contains(id)) {
        return Err(AppError::bad_request(format!(
            "Employee {} does not exist",
            missing
        )));
    }

    if let Some(visible) = visible_employee_ids(db, current).await? {
        if let Some(hidden) = employee_ids.iter().find(|id| !visible.contains(id)) {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("employee {} is outside the viewable scope", hidden),
            )
            .into());
        }
    }

    Ok(())
}

pub struct EmployeeService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> EmployeeService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_paginated(
        &self,
        current: &CurrentUser,
        filter: EmployeeFilterDto,
        pagination: PaginationParams,
    ) -> Result<PageDto<EmployeeDto>, AppError> {
        let department_ids = current.scope.narrow(filter.department_id);
        let filter = EmployeeFilter::from_dto(filter, department_ids);
        let per_page = pagination.per_page();

        let (employees, total) = EmployeeRepository::new(self.db)
            .get_paginated(&filter, pagination.page, per_page)
            .await?;

        Ok(PageDto::new(
            employees.into_iter().map(Employee::into_dto).collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    pub async fn get(&self, current: &CurrentUser, id: i32) -> Result<Employee, AppError> {
        require_employee_visible(self.db, current, id).await
    }

    /// Creates the login account and the HR record together.
    pub async fn create(&self, dto: CreateEmployeeDto) -> Result<Employee, AppError> {
        validate_password(&dto.password)?;
        let password_hash = hash_password(&dto.password)?;
        let mut params = CreateEmployeeParams::from_dto(dto, password_hash);

        params.username = required_text("username", &params.username, 50)?;
        params.real_name = required_text("real_name", &params.real_name, 50)?;
        params.employee_no = required_text("employee_no", &params.employee_no, 50)?;
        params.email = optional_text("email", params.email, 100)?;
        params.phone = optional_text("phone", params.phone, 30)?;
        params.position = optional_text("position", params.position, 50)?;

        if UserRepository::new(self.db)
            .find_by_username(&params.username)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request("Username already exists"));
        }
        if EmployeeRepository::new(self.db)
            .find_by_employee_no(&params.employee_no)
            .await?
            .is_some()
        {
            return Err(AppError::bad_request("Employee number already exists"));
        }
        if let Some(department_id) = params.department_id {
            self.require_department(department_id).await?;
        }

        let txn = self.db.begin().await?;
        let user = UserRepository::new(&txn)
            .create(CreateUserParams {
                username: params.username,
                password_hash: params.password_hash,
                real_name: params.real_name,
                email: params.email,
                phone: params.phone,
                department_id: params.department_id,
            })
            .await?;
        let employee = EmployeeRepository::new(&txn)
            .create(user.id, params.employee_no, params.position, params.hire_date)
            .await?;
        let created = EmployeeRepository::new(&txn)
            .find_by_id(employee.id)
            .await?
            .ok_or_else(|| AppError::InternalError("Employee vanished after insert".to_string()))?;
        txn.commit().await?;

        Ok(created)
    }

    pub async fn update(
        &self,
        current: &CurrentUser,
        id: i32,
        dto: UpdateEmployeeDto,
    ) -> Result<Employee, AppError> {
        require_employee_visible(self.db, current, id).await?;

        let mut params = UpdateEmployeeParams::from_dto(dto);
        if let Some(real_name) = &params.real_name {
            params.real_name = Some(required_text("real_name", real_name, 50)?);
        }
        if let Some(department_id) = params.department_id {
            self.require_department(department_id).await?;
        }
        if let Some(status) = &params.status {
            if !EMPLOYEE_STATUSES.contains(&status.as_str()) {
                return Err(AppError::bad_request(format!(
                    "status must be one of {:?}",
                    EMPLOYEE_STATUSES
                )));
            }
        }

        let txn = self.db.begin().await?;
        let employee_repo = EmployeeRepository::new(&txn);
        let user_repo = UserRepository::new(&txn);

        let employee = employee_repo
            .find_entity_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;
        let user = user_repo
            .find_by_id(employee.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        user_repo
            .update_profile(
                user,
                params.real_name,
                params.email,
                params.phone,
                params.department_id,
            )
            .await?;
        employee_repo
            .update(employee, params.position, params.hire_date, params.status)
            .await?;
        let updated = employee_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Employee not found"))?;
        txn.commit().await?;

        Ok(updated)
    }

    async fn require_department(&self, department_id: i32) -> Result<(), AppError> {
        if DepartmentRepository::new(self.db)
            .find_by_id(department_id)
            .await?
            .is_none()
        {
            return Err(AppError::bad_request("Department does not exist"));
        }
        Ok(())
    }
}

use sea_orm::DatabaseConnection;

use crate::{
    model::department::{CreateDepartmentDto, UpdateDepartmentDto},
    server::{
        data::{
            department::DepartmentRepository,
            employee::EmployeeRepository,
            user::UserRepository,
        },
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::{
            department::{CreateDepartmentParams, Department, UpdateDepartmentParams},
            employee::{Employee, EmployeeFilter},
        },
        util::validate::{optional_text, required_text},
    },
};

const NAME_MAX_CHARS: usize = 50;
const STATUSES: [&str; 2] = ["active", "inactive"];

pub struct DepartmentService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> DepartmentService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Departments inside the caller's viewable scope.
    pub async fn list_visible(&self, current: &CurrentUser) -> Result<Vec<Department>, AppError> {
        let ids = current.scope.department_ids();
        let departments = DepartmentRepository::new(self.db)
            .list(ids.as_deref())
            .await?;
        Ok(departments.into_iter().map(Department::from_entity).collect())
    }

    pub async fn list_active(&self) -> Result<Vec<Department>, AppError> {
        let departments = DepartmentRepository::new(self.db).list_active().await?;
        Ok(departments.into_iter().map(Department::from_entity).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Department, AppError> {
        DepartmentRepository::new(self.db)
            .find_by_id(id)
            .await?
            .map(Department::from_entity)
            .ok_or_else(|| AppError::not_found("Department not found"))
    }

    pub async fn create(&self, dto: CreateDepartmentDto) -> Result<Department, AppError> {
        let mut params = CreateDepartmentParams::from_dto(dto);
        params.name = required_text("name", &params.name, NAME_MAX_CHARS)?;
        params.description = optional_text("description", params.description, 200)?;
        validate_status(&params.status)?;

        let repo = DepartmentRepository::new(self.db);
        if repo.find_by_name(&params.name).await?.is_some() {
            return Err(AppError::bad_request("Department name already exists"));
        }
        if let Some(parent_id) = params.parent_id {
            if repo.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::bad_request("Parent department does not exist"));
            }
        }

        Ok(Department::from_entity(repo.create(params).await?))
    }

    pub async fn update(&self, id: i32, dto: UpdateDepartmentDto) -> Result<Department, AppError> {
        let mut params = UpdateDepartmentParams::from_dto(dto);
        let repo = DepartmentRepository::new(self.db);

        if repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Department not found"));
        }

        if let Some(name) = &params.name {
            let name = required_text("name", name, NAME_MAX_CHARS)?;
            if let Some(existing) = repo.find_by_name(&name).await? {
                if existing.id != id {
                    return Err(AppError::bad_request("Department name already exists"));
                }
            }
            params.name = Some(name);
        }
        if let Some(parent_id) = params.parent_id {
            if parent_id == id {
                return Err(AppError::bad_request("A department cannot be its own parent"));
            }
            if repo.find_by_id(parent_id).await?.is_none() {
                return Err(AppError::bad_request("Parent department does not exist"));
            }
        }
        if let Some(status) = &params.status {
            validate_status(status)?;
        }

        repo.update(id, params)
            .await?
            .map(Department::from_entity)
            .ok_or_else(|| AppError::not_found("Department not found"))
    }

    /// Deletes a department that no user or child department references.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let repo = DepartmentRepository::new(self.db);
        if repo.find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Department not found"));
        }

        if UserRepository::new(self.db).count_in_department(id).await? > 0 {
            return Err(AppError::bad_request(
                "Department still has users and cannot be deleted",
            ));
        }
        if repo.count_children(id).await? > 0 {
            return Err(AppError::bad_request(
                "Department has child departments and cannot be deleted",
            ));
        }

        if repo.delete(id).await? == 0 {
            return Err(AppError::not_found("Department not found"));
        }
        Ok(())
    }

    /// Active employees of a department inside the caller's scope.
    pub async fn employees(&self, current: &CurrentUser, id: i32) -> Result<Vec<Employee>, AppError> {
        if DepartmentRepository::new(self.db).find_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Department not found"));
        }
        if !current.scope.contains(Some(id)) {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("department {} is outside the viewable scope", id),
            )
            .into());
        }

        let filter = EmployeeFilter {
            keyword: None,
            department_ids: Some(vec![id]),
            status: Some("active".to_string()),
        };
        Ok(EmployeeRepository::new(self.db).list(&filter).await?)
    }
}

fn validate_status(status: &str) -> Result<(), AppError> {
    if !STATUSES.contains(&status) {
        return Err(AppError::bad_request(format!(
            "status must be one of {:?}",
            STATUSES
        )));
    }
    Ok(())
}

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::role::{CreateRoleDto, UpdateRoleDto},
    server::{
        data::{
            department::DepartmentRepository,
            role::{PermissionRepository, RoleRepository},
            user::UserRepository,
        },
        error::AppError,
        model::role::{CreateRoleParams, Role, UpdateRoleParams},
        util::validate::{dedup_ids, optional_text, required_text},
    },
};

pub struct RoleService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RoleService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list_permissions(&self) -> Result<Vec<entity::permission::Model>, AppError> {
        Ok(PermissionRepository::new(self.db).list().await?)
    }

    pub async fn list(&self) -> Result<Vec<Role>, AppError> {
        Ok(RoleRepository::new(self.db).list().await?)
    }

    pub async fn get(&self, id: i32) -> Result<Role, AppError> {
        RoleRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))
    }

    pub async fn create(&self, dto: CreateRoleDto) -> Result<Role, AppError> {
        let name = required_text("name", &dto.name, 50)?;
        let description = optional_text("description", dto.description, 200)?;

        if RoleRepository::new(self.db).find_by_name(&name).await?.is_some() {
            return Err(AppError::bad_request("Role name already exists"));
        }

        let permission_ids = self.resolve_permissions(&dto.permissions).await?;
        let department_ids = self.resolve_departments(&dto.department_ids).await?;

        let txn = self.db.begin().await?;
        let role = RoleRepository::new(&txn)
            .create(CreateRoleParams {
                name,
                description,
                is_super_admin: false,
                permission_ids,
                department_ids,
            })
            .await?;
        txn.commit().await?;

        Ok(role)
    }

    pub async fn update(&self, id: i32, dto: UpdateRoleDto) -> Result<Role, AppError> {
        let repo = RoleRepository::new(self.db);
        if repo.find_entity_by_id(id).await?.is_none() {
            return Err(AppError::not_found("Role not found"));
        }

        let name = match dto.name {
            Some(name) => {
                let name = required_text("name", &name, 50)?;
                if let Some(existing) = repo.find_by_name(&name).await? {
                    if existing.id != id {
                        return Err(AppError::bad_request("Role name already exists"));
                    }
                }
                Some(name)
            }
            None => None,
        };

        let permission_ids = match dto.permissions {
            Some(codes) => Some(self.resolve_permissions(&codes).await?),
            None => None,
        };
        let department_ids = match dto.department_ids {
            Some(ids) => Some(self.resolve_departments(&ids).await?),
            None => None,
        };

        let txn = self.db.begin().await?;
        let role = RoleRepository::new(&txn)
            .update(
                id,
                UpdateRoleParams {
                    name,
                    description: dto.description,
                    permission_ids,
                    department_ids,
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;
        txn.commit().await?;

        Ok(role)
    }

    /// Deletes a role. The super-admin role cannot be deleted.
    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let Some(role) = RoleRepository::new(self.db).find_entity_by_id(id).await? else {
            return Err(AppError::not_found("Role not found"));
        };
        if role.is_super_admin {
            return Err(AppError::bad_request("The super administrator role cannot be deleted"));
        }

        let txn = self.db.begin().await?;
        RoleRepository::new(&txn).delete(id).await?;
        txn.commit().await?;

        Ok(())
    }

    /// Replaces the roles of a user.
    pub async fn assign(&self, user_id: i32, role_ids: &[i32]) -> Result<Vec<i32>, AppError> {
        if UserRepository::new(self.db).find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let role_ids = dedup_ids(role_ids);
        let existing = RoleRepository::new(self.db).existing_ids(&role_ids).await?;
        if existing.len() != role_ids.len() {
            return Err(AppError::bad_request("Unknown role id"));
        }

        let txn = self.db.begin().await?;
        RoleRepository::new(&txn).set_user_roles(user_id, &role_ids).await?;
        txn.commit().await?;

        Ok(role_ids)
    }

    async fn resolve_permissions(&self, codes: &[String]) -> Result<Vec<i32>, AppError> {
        let mut codes: Vec<String> = codes.iter().map(|c| c.trim().to_string()).collect();
        codes.sort();
        codes.dedup();

        let permissions = PermissionRepository::new(self.db).find_by_codes(&codes).await?;
        if permissions.len() != codes.len() {
            let unknown: Vec<&String> = codes
                .iter()
                .filter(|c| !permissions.iter().any(|p| &p.code == *c))
                .collect();
            return Err(AppError::bad_request(format!(
                "Unknown permission codes: {:?}",
                unknown
            )));
        }

        Ok(permissions.into_iter().map(|p| p.id).collect())
    }

    async fn resolve_departments(&self, ids: &[i32]) -> Result<Vec<i32>, AppError> {
        let ids = dedup_ids(ids);
        let existing = DepartmentRepository::new(self.db).existing_ids(&ids).await?;
        if existing.len() != ids.len() {
            return Err(AppError::bad_request("Unknown department id"));
        }
        Ok(ids)
    }
}

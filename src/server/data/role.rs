use std::collections::BTreeSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

use crate::server::model::role::{CreateRoleParams, Role, UpdateRoleParams, UserAccess};

pub struct RoleRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> RoleRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a role with its permission and department links.
    pub async fn create(&self, params: CreateRoleParams) -> Result<Role, DbErr> {
        let role = entity::role::ActiveModel {
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            is_super_admin: ActiveValue::Set(params.is_super_admin),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        self.replace_permissions(role.id, &params.permission_ids)
            .await?;
        self.replace_departments(role.id, &params.department_ids)
            .await?;

        self.load(role).await
    }

    pub async fn find_entity_by_id(&self, id: i32) -> Result<Option<entity::role::Model>, DbErr> {
        entity::prelude::Role::find_by_id(id).one(self.db).await
    }

    /// Gets a role with permission codes and department ids.
    pub async fn find_by_id(&self, id: i32) -> Result<Option<Role>, DbErr> {
        match self.find_entity_by_id(id).await? {
            Some(role) => Ok(Some(self.load(role).await?)),
            None => Ok(None),
        }
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<entity::role::Model>, DbErr> {
        entity::prelude::Role::find()
            .filter(entity::role::Column::Name.eq(name))
            .one(self.db)
            .await
    }

    pub async fn find_super_admin_role(&self) -> Result<Option<entity::role::Model>, DbErr> {
        entity::prelude::Role::find()
            .filter(entity::role::Column::IsSuperAdmin.eq(true))
            .order_by_asc(entity::role::Column::Id)
            .one(self.db)
            .await
    }

    /// Lists all roles ordered by id.
    pub async fn list(&self) -> Result<Vec<Role>, DbErr> {
        let roles = entity::prelude::Role::find()
            .order_by_asc(entity::role::Column::Id)
            .all(self.db)
            .await?;

        let mut result = Vec::with_capacity(roles.len());
        for role in roles {
            result.push(self.load(role).await?);
        }
        Ok(result)
    }

    /// Applies the supplied fields; `Some` link lists replace the existing links.
    pub async fn update(&self, id: i32, params: UpdateRoleParams) -> Result<Option<Role>, DbErr> {
        let Some(role) = self.find_entity_by_id(id).await? else {
            return Ok(None);
        };

        let mut active_model: entity::role::ActiveModel = role.clone().into();
        if let Some(name) = params.name {
            active_model.name = ActiveValue::Set(name);
        }
        if let Some(description) = params.description {
            active_model.description = ActiveValue::Set(Some(description));
        }
        let role = if active_model.is_changed() {
            active_model.update(self.db).await?
        } else {
            role
        };

        if let Some(permission_ids) = params.permission_ids {
            self.replace_permissions(id, &permission_ids).await?;
        }
        if let Some(department_ids) = params.department_ids {
            self.replace_departments(id, &department_ids).await?;
        }

        Ok(Some(self.load(role).await?))
    }

    /// Deletes a role and every link referencing it.
    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        entity::prelude::RolePermission::delete_many()
            .filter(entity::role_permission::Column::RoleId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::RoleDepartment::delete_many()
            .filter(entity::role_department::Column::RoleId.eq(id))
            .exec(self.db)
            .await?;
        entity::prelude::UserRole::delete_many()
            .filter(entity::user_role::Column::RoleId.eq(id))
            .exec(self.db)
            .await?;

        let result = entity::prelude::Role::delete_by_id(id).exec(self.db).await?;
        Ok(result.rows_affected)
    }

    pub async fn role_ids_for_user(&self, user_id: i32) -> Result<Vec<i32>, DbErr> {
        entity::prelude::UserRole::find()
            .select_only()
            .column(entity::user_role::Column::RoleId)
            .filter(entity::user_role::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    /// Replaces the user's roles with `role_ids`.
    pub async fn set_user_roles(&self, user_id: i32, role_ids: &[i32]) -> Result<(), DbErr> {
        entity::prelude::UserRole::delete_many()
            .filter(entity::user_role::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;

        for role_id in role_ids {
            entity::user_role::ActiveModel {
                user_id: ActiveValue::Set(user_id),
                role_id: ActiveValue::Set(*role_id),
            }
            .insert(self.db)
            .await?;
        }
        Ok(())
    }

    /// Merges the permissions, department links and super-admin flag of every role of
    /// the user.
    pub async fn access_for_user(&self, user_id: i32) -> Result<UserAccess, DbErr> {
        let role_ids = self.role_ids_for_user(user_id).await?;
        if role_ids.is_empty() {
            return Ok(UserAccess::default());
        }

        let is_super_admin = entity::prelude::Role::find()
            .filter(entity::role::Column::Id.is_in(role_ids.clone()))
            .filter(entity::role::Column::IsSuperAdmin.eq(true))
            .count(self.db)
            .await?
            > 0;

        let permission_ids: Vec<i32> = entity::prelude::RolePermission::find()
            .select_only()
            .column(entity::role_permission::Column::PermissionId)
            .filter(entity::role_permission::Column::RoleId.is_in(role_ids.clone()))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        let permission_codes: BTreeSet<String> = if permission_ids.is_empty() {
            BTreeSet::new()
        } else {
            entity::prelude::Permission::find()
                .select_only()
                .column(entity::permission::Column::Code)
                .filter(entity::permission::Column::Id.is_in(permission_ids))
                .into_tuple::<String>()
                .all(self.db)
                .await?
                .into_iter()
                .collect()
        };

        let department_ids: BTreeSet<i32> = entity::prelude::RoleDepartment::find()
            .select_only()
            .column(entity::role_department::Column::DepartmentId)
            .filter(entity::role_department::Column::RoleId.is_in(role_ids))
            .into_tuple::<i32>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        Ok(UserAccess {
            is_super_admin,
            permission_codes: permission_codes.into_iter().collect(),
            department_ids: department_ids.into_iter().collect(),
        })
    }

    /// Whether any user holds a super-admin role.
    pub async fn super_admin_exists(&self) -> Result<bool, DbErr> {
        let super_role_ids: Vec<i32> = entity::prelude::Role::find()
            .select_only()
            .column(entity::role::Column::Id)
            .filter(entity::role::Column::IsSuperAdmin.eq(true))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        if super_role_ids.is_empty() {
            return Ok(false);
        }

        let holders = entity::prelude::UserRole::find()
            .filter(entity::user_role::Column::RoleId.is_in(super_role_ids))
            .count(self.db)
            .await?;

        Ok(holders > 0)
    }

    /// Distinct user ids holding any of the roles.
    pub async fn user_ids_with_roles(&self, role_ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids: BTreeSet<i32> = entity::prelude::UserRole::find()
            .select_only()
            .column(entity::user_role::Column::UserId)
            .filter(entity::user_role::Column::RoleId.is_in(role_ids.to_vec()))
            .into_tuple::<i32>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        Ok(ids.into_iter().collect())
    }

    /// Returns which of `ids` exist.
    pub async fn existing_ids(&self, ids: &[i32]) -> Result<Vec<i32>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Role::find()
            .select_only()
            .column(entity::role::Column::Id)
            .filter(entity::role::Column::Id.is_in(ids.to_vec()))
            .into_tuple::<i32>()
            .all(self.db)
            .await
    }

    async fn replace_permissions(&self, role_id: i32, permission_ids: &[i32]) -> Result<(), DbErr> {
        entity::prelude::RolePermission::delete_many()
            .filter(entity::role_permission::Column::RoleId.eq(role_id))
            .exec(self.db)
            .await?;

        for permission_id in permission_ids {
            entity::role_permission::ActiveModel {
                role_id: ActiveValue::Set(role_id),
                permission_id: ActiveValue::Set(*permission_id),
            }
            .insert(self.db)
            .await?;
        }
        Ok(())
    }

    async fn replace_departments(&self, role_id: i32, department_ids: &[i32]) -> Result<(), DbErr> {
        entity::prelude::RoleDepartment::delete_many()
            .filter(entity::role_department::Column::RoleId.eq(role_id))
            .exec(self.db)
            .await?;

        for department_id in department_ids {
            entity::role_department::ActiveModel {
                role_id: ActiveValue::Set(role_id),
                department_id: ActiveValue::Set(*department_id),
            }
            .insert(self.db)
            .await?;
        }
        Ok(())
    }

    async fn load(&self, role: entity::role::Model) -> Result<Role, DbErr> {
        let permission_ids: Vec<i32> = entity::prelude::RolePermission::find()
            .select_only()
            .column(entity::role_permission::Column::PermissionId)
            .filter(entity::role_permission::Column::RoleId.eq(role.id))
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        let permissions = PermissionRepository::new(self.db)
            .codes_for_ids(&permission_ids)
            .await?;

        let department_ids: Vec<i32> = entity::prelude::RoleDepartment::find()
            .select_only()
            .column(entity::role_department::Column::DepartmentId)
            .filter(entity::role_department::Column::RoleId.eq(role.id))
            .order_by_asc(entity::role_department::Column::DepartmentId)
            .into_tuple::<i32>()
            .all(self.db)
            .await?;

        Ok(Role::from_entity(role, permissions, department_ids))
    }
}

pub struct PermissionRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PermissionRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Lists the permission catalogue grouped by module.
    pub async fn list(&self) -> Result<Vec<entity::permission::Model>, DbErr> {
        entity::prelude::Permission::find()
            .order_by_asc(entity::permission::Column::Module)
            .order_by_asc(entity::permission::Column::Code)
            .all(self.db)
            .await
    }

    pub async fn find_by_codes(
        &self,
        codes: &[String],
    ) -> Result<Vec<entity::permission::Model>, DbErr> {
        if codes.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Permission::find()
            .filter(entity::permission::Column::Code.is_in(codes.to_vec()))
            .all(self.db)
            .await
    }

    pub async fn codes_for_ids(&self, ids: &[i32]) -> Result<Vec<String>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Permission::find()
            .select_only()
            .column(entity::permission::Column::Code)
            .filter(entity::permission::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(entity::permission::Column::Code)
            .into_tuple::<String>()
            .all(self.db)
            .await
    }
}

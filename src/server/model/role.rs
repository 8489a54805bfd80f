//! Role and permission domain models.

use chrono::{DateTime, Utc};

use crate::model::role::{PermissionDto, RoleDto};

/// Effective access of a user, merged across all of their roles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserAccess {
    pub is_super_admin: bool,
    pub permission_codes: Vec<String>,
    pub department_ids: Vec<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Role {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    pub department_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn from_entity(
        entity: entity::role::Model,
        permissions: Vec<String>,
        department_ids: Vec<i32>,
    ) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            is_super_admin: entity.is_super_admin,
            permissions,
            department_ids,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> RoleDto {
        RoleDto {
            id: self.id,
            name: self.name,
            description: self.description,
            is_super_admin: self.is_super_admin,
            permissions: self.permissions,
            department_ids: self.department_ids,
            created_at: self.created_at,
        }
    }
}

pub fn permission_into_dto(entity: entity::permission::Model) -> PermissionDto {
    PermissionDto {
        id: entity.id,
        code: entity.code,
        name: entity.name,
        module: entity.module,
    }
}

#[derive(Debug, Clone)]
pub struct CreateRoleParams {
    pub name: String,
    pub description: Option<String>,
    pub is_super_admin: bool,
    pub permission_ids: Vec<i32>,
    pub department_ids: Vec<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRoleParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permission_ids: Option<Vec<i32>>,
    pub department_ids: Option<Vec<i32>>,
}

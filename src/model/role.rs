use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct PermissionDto {
    pub id: i32,
    pub code: String,
    pub name: String,
    pub module: String,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_super_admin: bool,
    /// Permission codes.
    pub permissions: Vec<String>,
    /// Departments viewable through this role.
    pub department_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateRoleDto {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub department_ids: Vec<i32>,
}

/// Partial update; omitted lists are left unchanged, empty lists clear them.
#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateRoleDto {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub department_ids: Option<Vec<i32>>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct AssignRolesDto {
    pub role_ids: Vec<i32>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct DepartmentDto {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    pub status: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateDepartmentDto {
    pub name: String,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    /// `active` (default) or `inactive`.
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

/// Partial update; omitted fields are left unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, Default, ToSchema)]
pub struct UpdateDepartmentDto {
    pub name: Option<String>,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

//! Department domain model and parameters.

use chrono::{DateTime, Utc};

use crate::model::department::{CreateDepartmentDto, DepartmentDto, UpdateDepartmentDto};

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    pub status: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn from_entity(entity: entity::department::Model) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            parent_id: entity.parent_id,
            description: entity.description,
            status: entity.status,
            sort_order: entity.sort_order,
            created_at: entity.created_at,
        }
    }

    pub fn into_dto(self) -> DepartmentDto {
        DepartmentDto {
            id: self.id,
            name: self.name,
            parent_id: self.parent_id,
            description: self.description,
            status: self.status,
            sort_order: self.sort_order,
            created_at: self.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateDepartmentParams {
    pub name: String,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    pub status: String,
    pub sort_order: i32,
}

impl CreateDepartmentParams {
    pub fn from_dto(dto: CreateDepartmentDto) -> Self {
        Self {
            name: dto.name,
            parent_id: dto.parent_id,
            description: dto.description,
            status: dto.status.unwrap_or_else(|| "active".to_string()),
            sort_order: dto.sort_order.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UpdateDepartmentParams {
    pub name: Option<String>,
    pub parent_id: Option<i32>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub sort_order: Option<i32>,
}

impl UpdateDepartmentParams {
    pub fn from_dto(dto: UpdateDepartmentDto) -> Self {
        Self {
            name: dto.name,
            parent_id: dto.parent_id,
            description: dto.description,
            status: dto.status,
            sort_order: dto.sort_order,
        }
    }
}

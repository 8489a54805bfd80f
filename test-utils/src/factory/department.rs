//! Department factory for creating test department entities.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test departments with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let child = DepartmentFactory::new(&db)
///     .name("Night Shift")
///     .parent_id(Some(parent.id))
///     .build()
///     .await?;
/// ```
pub struct DepartmentFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    parent_id: Option<i32>,
    status: String,
    sort_order: i32,
}

impl<'a> DepartmentFactory<'a> {
    /// Creates a new DepartmentFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Department {id}"`
    /// - parent_id: `None`
    /// - status: `"active"`
    /// - sort_order: `0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("Department {}", next_id()),
            parent_id: None,
            status: "active".to_string(),
            sort_order: 0,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn parent_id(mut self, parent_id: Option<i32>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    pub fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Builds and inserts the department entity into the database.
    pub async fn build(self) -> Result<entity::department::Model, DbErr> {
        entity::department::ActiveModel {
            name: ActiveValue::Set(self.name),
            parent_id: ActiveValue::Set(self.parent_id),
            description: ActiveValue::Set(None),
            status: ActiveValue::Set(self.status),
            sort_order: ActiveValue::Set(self.sort_order),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active department with default values.
pub async fn create_department(db: &DatabaseConnection) -> Result<entity::department::Model, DbErr> {
    DepartmentFactory::new(db).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_department_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(Department)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let department = create_department(db).await?;

        assert!(department.name.starts_with("Department "));
        assert_eq!(department.status, "active");
        assert!(department.parent_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn creates_child_department() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(Department)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let parent = create_department(db).await?;
        let child = DepartmentFactory::new(db)
            .name("Night Shift")
            .parent_id(Some(parent.id))
            .sort_order(3)
            .build()
            .await?;

        assert_eq!(child.name, "Night Shift");
        assert_eq!(child.parent_id, Some(parent.id));
        assert_eq!(child.sort_order, 3);

        Ok(())
    }
}

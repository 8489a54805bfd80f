//! Role factory for creating roles with permissions and viewable departments.
//!
//! Permission rows are looked up by code and inserted when missing, so tests do not
//! need to seed the permission catalogue before building roles.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter,
};

/// Factory for creating test roles.
///
/// # Example
///
/// ```rust,ignore
/// let role = RoleFactory::new(&db)
///     .permissions(&["employee:view", "vacation:manage"])
///     .departments(&[department.id])
///     .build()
///     .await?;
/// assign_role(&db, user.id, role.id).await?;
/// ```
pub struct RoleFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    is_super_admin: bool,
    permissions: Vec<String>,
    departments: Vec<i32>,
}

impl<'a> RoleFactory<'a> {
    /// Creates a new RoleFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Role {id}"`
    /// - is_super_admin: `false`
    /// - no permissions, no viewable departments
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("Role {}", next_id()),
            is_super_admin: false,
            permissions: Vec::new(),
            departments: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn super_admin(mut self, is_super_admin: bool) -> Self {
        self.is_super_admin = is_super_admin;
        self
    }

    /// Grants the given permission codes to the role.
    pub fn permissions(mut self, codes: &[&str]) -> Self {
        self.permissions = codes.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Makes the given departments viewable through the role.
    pub fn departments(mut self, department_ids: &[i32]) -> Self {
        self.departments = department_ids.to_vec();
        self
    }

    /// Builds the role and its permission and department links.
    pub async fn build(self) -> Result<entity::role::Model, DbErr> {
        let role = entity::role::ActiveModel {
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            is_super_admin: ActiveValue::Set(self.is_super_admin),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        for code in self.permissions {
            let permission = ensure_permission(self.db, &code).await?;
            entity::role_permission::ActiveModel {
                role_id: ActiveValue::Set(role.id),
                permission_id: ActiveValue::Set(permission.id),
            }
            .insert(self.db)
            .await?;
        }

        for department_id in self.departments {
            entity::role_department::ActiveModel {
                role_id: ActiveValue::Set(role.id),
                department_id: ActiveValue::Set(department_id),
            }
            .insert(self.db)
            .await?;
        }

        Ok(role)
    }
}

/// Finds a permission by code, inserting it when missing.
pub async fn ensure_permission(
    db: &DatabaseConnection,
    code: &str,
) -> Result<entity::permission::Model, DbErr> {
    if let Some(existing) = entity::prelude::Permission::find()
        .filter(entity::permission::Column::Code.eq(code))
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let module = code.split(':').next().unwrap_or(code).to_string();
    entity::permission::ActiveModel {
        code: ActiveValue::Set(code.to_string()),
        name: ActiveValue::Set(code.to_string()),
        module: ActiveValue::Set(module),
        ..Default::default()
    }
    .insert(db)
    .await
}

/// Creates a plain role without permissions.
pub async fn create_role(db: &DatabaseConnection) -> Result<entity::role::Model, DbErr> {
    RoleFactory::new(db).build().await
}

/// Assigns a role to a user.
pub async fn assign_role(
    db: &DatabaseConnection,
    user_id: i32,
    role_id: i32,
) -> Result<entity::user_role::Model, DbErr> {
    entity::user_role::ActiveModel {
        user_id: ActiveValue::Set(user_id),
        role_id: ActiveValue::Set(role_id),
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::department::create_department;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_role_with_links() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_org_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let department = create_department(db).await?;
        let role = RoleFactory::new(db)
            .permissions(&["employee:view", "employee:manage"])
            .departments(&[department.id])
            .build()
            .await?;

        let permissions = RolePermission::find()
            .filter(entity::role_permission::Column::RoleId.eq(role.id))
            .all(db)
            .await?;
        let departments = RoleDepartment::find()
            .filter(entity::role_department::Column::RoleId.eq(role.id))
            .all(db)
            .await?;

        assert_eq!(permissions.len(), 2);
        assert_eq!(departments.len(), 1);
        assert!(!role.is_super_admin);

        Ok(())
    }

    #[tokio::test]
    async fn reuses_existing_permission_rows() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_org_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        RoleFactory::new(db)
            .permissions(&["employee:view"])
            .build()
            .await?;
        RoleFactory::new(db)
            .permissions(&["employee:view"])
            .build()
            .await?;

        let count = Permission::find().all(db).await?.len();
        assert_eq!(count, 1);

        Ok(())
    }
}

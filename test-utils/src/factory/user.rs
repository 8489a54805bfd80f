//! User factory for creating test login accounts.
//!
//! The factory stores whatever password hash it is given. Tests exercising login
//! hash a known password with the server's password utility and pass the result
//! through `password_hash`.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test users with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::user::UserFactory;
///
/// let user = UserFactory::new(&db)
///     .username("alice")
///     .department_id(Some(department.id))
///     .build()
///     .await?;
/// ```
pub struct UserFactory<'a> {
    db: &'a DatabaseConnection,
    username: String,
    password_hash: String,
    real_name: String,
    email: Option<String>,
    department_id: Option<i32>,
    status: String,
}

impl<'a> UserFactory<'a> {
    /// Creates a new UserFactory with default values.
    ///
    /// Defaults:
    /// - username: `"user_{id}"` where id is auto-incremented
    /// - password_hash: a value no password hashes to
    /// - real_name: `"User {id}"`
    /// - department_id: `None`
    /// - status: `"active"`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    ///
    /// # Returns
    /// - `UserFactory` - New factory instance with defaults
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            username: format!("user_{}", id),
            password_hash: "!".to_string(),
            real_name: format!("User {}", id),
            email: None,
            department_id: None,
            status: "active".to_string(),
        }
    }

    /// Sets the login name for the user.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the stored `salt$hash` password value.
    pub fn password_hash(mut self, password_hash: impl Into<String>) -> Self {
        self.password_hash = password_hash.into();
        self
    }

    pub fn real_name(mut self, real_name: impl Into<String>) -> Self {
        self.real_name = real_name.into();
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn department_id(mut self, department_id: Option<i32>) -> Self {
        self.department_id = department_id;
        self
    }

    /// Sets the account status (`active` or `inactive`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Builds and inserts the user entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::user::Model)` - Created user entity
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::user::Model, DbErr> {
        entity::user::ActiveModel {
            username: ActiveValue::Set(self.username),
            password_hash: ActiveValue::Set(self.password_hash),
            real_name: ActiveValue::Set(self.real_name),
            email: ActiveValue::Set(self.email),
            phone: ActiveValue::Set(None),
            department_id: ActiveValue::Set(self.department_id),
            status: ActiveValue::Set(self.status),
            created_at: ActiveValue::Set(Utc::now()),
            last_login_at: ActiveValue::Set(None),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active user without a department.
///
/// Shorthand for `UserFactory::new(db).build().await`.
pub async fn create_user(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db).build().await
}

/// Creates an active user inside the given department.
pub async fn create_user_in_department(
    db: &DatabaseConnection,
    department_id: i32,
) -> Result<entity::user::Model, DbErr> {
    UserFactory::new(db)
        .department_id(Some(department_id))
        .build()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use entity::prelude::*;

    #[tokio::test]
    async fn creates_user_with_defaults() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(Department)
            .with_table(User)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let user = create_user(db).await?;

        assert!(user.username.starts_with("user_"));
        assert_eq!(user.status, "active");
        assert!(user.department_id.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn creates_multiple_unique_users() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_table(Department)
            .with_table(User)
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let first = create_user(db).await?;
        let second = create_user(db).await?;

        assert_ne!(first.id, second.id);
        assert_ne!(first.username, second.username);

        Ok(())
    }
}

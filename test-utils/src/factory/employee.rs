//! Employee factory for creating HR records bound to an existing user.

use crate::factory::helpers::next_id;
use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test employee records.
pub struct EmployeeFactory<'a> {
    db: &'a DatabaseConnection,
    user_id: i32,
    employee_no: String,
    position: Option<String>,
    hire_date: Option<NaiveDate>,
    status: String,
}

impl<'a> EmployeeFactory<'a> {
    /// Creates a new EmployeeFactory for the given user.
    ///
    /// Defaults:
    /// - employee_no: `"E{id:05}"`
    /// - position: `None`
    /// - hire_date: `None`
    /// - status: `"active"`
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        Self {
            db,
            user_id,
            employee_no: format!("E{:05}", next_id()),
            position: None,
            hire_date: None,
            status: "active".to_string(),
        }
    }

    pub fn employee_no(mut self, employee_no: impl Into<String>) -> Self {
        self.employee_no = employee_no.into();
        self
    }

    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = Some(position.into());
        self
    }

    pub fn hire_date(mut self, hire_date: NaiveDate) -> Self {
        self.hire_date = Some(hire_date);
        self
    }

    /// Sets the employment status (`active` or `resigned`).
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Builds and inserts the employee entity into the database.
    pub async fn build(self) -> Result<entity::employee::Model, DbErr> {
        entity::employee::ActiveModel {
            user_id: ActiveValue::Set(self.user_id),
            employee_no: ActiveValue::Set(self.employee_no),
            position: ActiveValue::Set(self.position),
            hire_date: ActiveValue::Set(self.hire_date),
            status: ActiveValue::Set(self.status),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an active employee record for the user.
pub async fn create_employee(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::employee::Model, DbErr> {
    EmployeeFactory::new(db, user_id).build().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;
    use crate::factory::user::create_user;

    #[tokio::test]
    async fn creates_employee_for_user() -> Result<(), DbErr> {
        let test = TestBuilder::new().with_org_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();

        let user = create_user(db).await?;
        let employee = EmployeeFactory::new(db, user.id)
            .employee_no("E-42")
            .position("Nurse")
            .build()
            .await?;

        assert_eq!(employee.user_id, user.id);
        assert_eq!(employee.employee_no, "E-42");
        assert_eq!(employee.position.as_deref(), Some("Nurse"));
        assert_eq!(employee.status, "active");

        Ok(())
    }
}

//! Work shift factory.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test work shifts.
pub struct WorkShiftFactory<'a> {
    db: &'a DatabaseConnection,
    name: String,
    start_time: String,
    end_time: String,
    is_rest: bool,
    department_id: Option<i32>,
}

impl<'a> WorkShiftFactory<'a> {
    /// Creates a new WorkShiftFactory with default values.
    ///
    /// Defaults:
    /// - name: `"Shift {id}"`
    /// - 09:00 to 17:00, global, not a rest shift
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            name: format!("Shift {}", next_id()),
            start_time: "09:00".to_string(),
            end_time: "17:00".to_string(),
            is_rest: false,
            department_id: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn hours(mut self, start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        self.start_time = start_time.into();
        self.end_time = end_time.into();
        self
    }

    pub fn rest(mut self, is_rest: bool) -> Self {
        self.is_rest = is_rest;
        self
    }

    pub fn department_id(mut self, department_id: Option<i32>) -> Self {
        self.department_id = department_id;
        self
    }

    pub async fn build(self) -> Result<entity::work_shift::Model, DbErr> {
        entity::work_shift::ActiveModel {
            name: ActiveValue::Set(self.name),
            start_time: ActiveValue::Set(self.start_time),
            end_time: ActiveValue::Set(self.end_time),
            color: ActiveValue::Set("#1890ff".to_string()),
            is_rest: ActiveValue::Set(self.is_rest),
            department_id: ActiveValue::Set(self.department_id),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates a global 09:00-17:00 shift.
pub async fn create_shift(db: &DatabaseConnection) -> Result<entity::work_shift::Model, DbErr> {
    WorkShiftFactory::new(db).build().await
}

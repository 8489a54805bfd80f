//! Vacation type and holiday factories.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test vacation types.
pub struct VacationTypeFactory<'a> {
    db: &'a DatabaseConnection,
    code: String,
    name: String,
    enabled: bool,
    sort_order: i32,
}

impl<'a> VacationTypeFactory<'a> {
    /// Creates a new VacationTypeFactory with default values.
    ///
    /// Defaults:
    /// - code: `"type_{id}"`
    /// - name: `"Vacation {id}"`
    /// - enabled: `true`
    /// - sort_order: `0`
    pub fn new(db: &'a DatabaseConnection) -> Self {
        let id = next_id();
        Self {
            db,
            code: format!("type_{}", id),
            name: format!("Vacation {}", id),
            enabled: true,
            sort_order: 0,
        }
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub async fn build(self) -> Result<entity::vacation_type::Model, DbErr> {
        entity::vacation_type::ActiveModel {
            code: ActiveValue::Set(self.code),
            name: ActiveValue::Set(self.name),
            description: ActiveValue::Set(None),
            enabled: ActiveValue::Set(self.enabled),
            sort_order: ActiveValue::Set(self.sort_order),
            created_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        }
        .insert(self.db)
        .await
    }
}

/// Creates an enabled vacation type with a unique code.
pub async fn create_vacation_type(
    db: &DatabaseConnection,
) -> Result<entity::vacation_type::Model, DbErr> {
    VacationTypeFactory::new(db).build().await
}

/// Creates a statutory holiday entry of `days` days in January of `year`.
///
/// # Arguments
/// - `db` - Database connection
/// - `vacation_type_id` - Vacation type the days are credited to
/// - `year` - Entitlement year
/// - `days` - Number of days (1-31)
pub async fn create_holiday(
    db: &DatabaseConnection,
    vacation_type_id: i32,
    year: i32,
    days: i32,
) -> Result<entity::holiday::Model, DbErr> {
    create_holiday_in_month(db, vacation_type_id, year, 1, days).await
}

/// Creates a statutory holiday entry in a specific month.
pub async fn create_holiday_in_month(
    db: &DatabaseConnection,
    vacation_type_id: i32,
    year: i32,
    month: i32,
    days: i32,
) -> Result<entity::holiday::Model, DbErr> {
    entity::holiday::ActiveModel {
        name: ActiveValue::Set(format!("Holiday {}", next_id())),
        days: ActiveValue::Set(days),
        month: ActiveValue::Set(month),
        year: ActiveValue::Set(year),
        vacation_type_id: ActiveValue::Set(vacation_type_id),
        created_at: ActiveValue::Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TestBuilder;

    #[tokio::test]
    async fn creates_type_and_holiday() -> Result<(), DbErr> {
        let test = TestBuilder::new()
            .with_vacation_tables()
            .build()
            .await
            .unwrap();
        let db = test.db.as_ref().unwrap();

        let vacation_type = VacationTypeFactory::new(db).code("annual").build().await?;
        let holiday = create_holiday_in_month(db, vacation_type.id, 2025, 5, 3).await?;

        assert_eq!(vacation_type.code, "annual");
        assert!(vacation_type.enabled);
        assert_eq!(holiday.vacation_type_id, vacation_type.id);
        assert_eq!(holiday.month, 5);
        assert_eq!(holiday.days, 3);

        Ok(())
    }
}

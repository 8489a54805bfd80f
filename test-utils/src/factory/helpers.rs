//! Shared helper utilities for factory methods.
//!
//! This module provides common utilities used across all factory modules,
//! including ID generation and convenience methods for creating entities
//! with their dependencies.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates a user and the employee record bound to it.
///
/// # Arguments
/// - `db` - Database connection
/// - `department_id` - Department of the user account, if any
///
/// # Returns
/// - `Ok((user, employee))` - Created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_employee_with_user(
    db: &DatabaseConnection,
    department_id: Option<i32>,
) -> Result<(entity::user::Model, entity::employee::Model), DbErr> {
    let user = crate::factory::user::UserFactory::new(db)
        .department_id(department_id)
        .build()
        .await?;
    let employee = crate::factory::employee::create_employee(db, user.id).await?;

    Ok((user, employee))
}

/// Creates a user holding a fresh super administrator role.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok(entity::user::Model)` - The super administrator account
/// - `Err(DbErr)` - Database error during creation
pub async fn create_super_admin(db: &DatabaseConnection) -> Result<entity::user::Model, DbErr> {
    let user = crate::factory::user::create_user(db).await?;
    let role = crate::factory::role::RoleFactory::new(db)
        .super_admin(true)
        .build()
        .await?;
    crate::factory::role::assign_role(db, user.id, role.id).await?;

    Ok(user)
}

//! Factory methods for creating test data.
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation. Defaults are unique
//! per call (usernames, department names, codes) so factories can be called repeatedly
//! within one test.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     let department = factory::create_department(&db).await?;
//!     let (user, employee) =
//!         factory::helpers::create_employee_with_user(&db, Some(department.id)).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Available Factories
//!
//! - `department` - Departments
//! - `user` - Login accounts
//! - `employee` - HR records bound to a user
//! - `role` - Roles with permissions and viewable departments
//! - `vacation` - Vacation types and statutory holiday entries
//! - `shift` - Work shifts
//! - `assessment` - Exams and assessment plans
//! - `inventory` - Stocked supply items
//! - `helpers` - ID generation and multi-entity shortcuts

pub mod assessment;
pub mod department;
pub mod employee;
pub mod helpers;
pub mod inventory;
pub mod role;
pub mod shift;
pub mod user;
pub mod vacation;

pub use assessment::{create_exam, create_plan};
pub use department::create_department;
pub use employee::create_employee;
pub use inventory::create_inventory_item;
pub use role::{assign_role, create_role};
pub use shift::create_shift;
pub use user::create_user;
pub use vacation::{create_holiday, create_vacation_type};

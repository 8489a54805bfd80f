//! hrdesk Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the hrdesk
//! backend. This crate offers a builder pattern for creating test contexts with in-memory
//! SQLite databases and customizable table schemas, plus factories for inserting rows with
//! sensible defaults.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Row factories (departments, users, employees, roles, ...)
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn test_department_operations() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new().with_org_tables().build().await.unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     let department = factory::department::create_department(db).await?;
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;

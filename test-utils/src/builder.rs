use entity::prelude::*;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{context::TestContext, error::TestError};

/// Builder for creating test contexts with customizable database schemas.
///
/// Provides a fluent interface for configuring test environments with in-memory SQLite
/// databases. Use the builder pattern to add entity tables, then call `build()` to
/// create the configured test context.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::builder::TestBuilder;
/// use entity::prelude::{Department, User};
///
/// let test = TestBuilder::new()
///     .with_table(Department)
///     .with_table(User)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// CREATE TABLE statements executed in insertion order during `build()`.
    tables: Vec<TableCreateStatement>,
}

impl TestBuilder {
    /// Creates a new test builder with no tables configured.
    pub fn new() -> Self {
        Self { tables: Vec::new() }
    }

    /// Adds an entity table to the test database schema.
    ///
    /// Generates a CREATE TABLE statement from the provided SeaORM entity using SQLite
    /// backend syntax. Tables should be added in dependency order (tables with foreign
    /// keys after the tables they reference).
    ///
    /// # Arguments
    /// - `entity` - SeaORM entity model implementing `EntityTrait` to create table for
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Adds the organisation tables every other area depends on.
    ///
    /// - Department, User, Employee
    /// - Role, Permission, RolePermission, UserRole, RoleDepartment
    pub fn with_org_tables(self) -> Self {
        self.with_table(Department)
            .with_table(User)
            .with_table(Employee)
            .with_table(Role)
            .with_table(Permission)
            .with_table(RolePermission)
            .with_table(UserRole)
            .with_table(RoleDepartment)
    }

    /// Adds organisation tables plus shifts and schedules.
    pub fn with_schedule_tables(self) -> Self {
        self.with_org_tables()
            .with_table(WorkShift)
            .with_table(ShiftSchedule)
    }

    /// Adds everything the vacation ledger touches.
    ///
    /// Leave approval writes balances, audit rows, schedule rest days and a
    /// notification, so this includes the schedule and notification tables.
    pub fn with_vacation_tables(self) -> Self {
        self.with_schedule_tables()
            .with_table(VacationType)
            .with_table(Holiday)
            .with_table(ConversionRule)
            .with_table(VacationBalance)
            .with_table(VacationAuditLog)
            .with_table(OvertimeRecord)
            .with_table(OvertimeConversion)
            .with_table(LeaveRecord)
            .with_table(Notification)
    }

    /// Adds organisation tables plus exams, plans, results and notifications.
    pub fn with_assessment_tables(self) -> Self {
        self.with_org_tables()
            .with_table(Exam)
            .with_table(AssessmentPlan)
            .with_table(AssessmentPlanDepartment)
            .with_table(AssessmentResult)
            .with_table(Notification)
    }

    /// Adds organisation tables plus notifications, broadcasts, chat and memos.
    pub fn with_messaging_tables(self) -> Self {
        self.with_org_tables()
            .with_table(Notification)
            .with_table(Broadcast)
            .with_table(BroadcastTarget)
            .with_table(BroadcastRecipient)
            .with_table(ChatGroup)
            .with_table(ChatGroupMember)
            .with_table(ChatMessage)
            .with_table(Memo)
            .with_table(MemoRecipient)
    }

    /// Adds the vacation tables plus daily clock records.
    ///
    /// Clock statistics read approved leave and overtime, and late or early clocks
    /// look up the day's schedule.
    pub fn with_clock_tables(self) -> Self {
        self.with_vacation_tables().with_table(AttendanceRecord)
    }

    /// Adds organisation tables plus reimbursement claims, their items and history.
    pub fn with_reimbursement_tables(self) -> Self {
        self.with_org_tables()
            .with_table(Notification)
            .with_table(Reimbursement)
            .with_table(ReimbursementItem)
            .with_table(ReimbursementLog)
    }

    /// Adds organisation tables plus supply items and every stock movement table.
    pub fn with_inventory_tables(self) -> Self {
        self.with_org_tables()
            .with_table(InventoryItem)
            .with_table(ProcurementRecord)
            .with_table(InventoryUsage)
            .with_table(InventoryAudit)
            .with_table(InventoryStockLog)
    }

    /// Builds and initializes the test context with configured tables.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context with database and tables ready
    /// - `Err(TestError::Database)`- Failed to connect to database or create tables
    pub async fn build(self) -> Result<TestContext, TestError> {
        let mut setup = TestContext::new();

        setup.with_tables(self.tables).await?;

        Ok(setup)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

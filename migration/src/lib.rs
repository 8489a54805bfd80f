pub use sea_orm_migration::prelude::*;

mod m20251001_000001_create_department_table;
mod m20251001_000002_create_user_table;
mod m20251001_000003_create_employee_table;
mod m20251001_000004_create_role_tables;
mod m20251002_000005_create_vacation_tables;
mod m20251002_000006_create_attendance_tables;
mod m20251003_000007_create_schedule_tables;
mod m20251004_000008_create_assessment_tables;
mod m20251005_000009_create_notification_table;
mod m20251005_000010_create_broadcast_tables;
mod m20251006_000011_create_chat_tables;
mod m20251006_000012_create_memo_tables;
mod m20251007_000013_add_assessment_attempt_index;
mod m20251008_000014_create_attendance_record_table;
mod m20251009_000015_create_reimbursement_tables;
mod m20251009_000016_create_inventory_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251001_000001_create_department_table::Migration),
            Box::new(m20251001_000002_create_user_table::Migration),
            Box::new(m20251001_000003_create_employee_table::Migration),
            Box::new(m20251001_000004_create_role_tables::Migration),
            Box::new(m20251002_000005_create_vacation_tables::Migration),
            Box::new(m20251002_000006_create_attendance_tables::Migration),
            Box::new(m20251003_000007_create_schedule_tables::Migration),
            Box::new(m20251004_000008_create_assessment_tables::Migration),
            Box::new(m20251005_000009_create_notification_table::Migration),
            Box::new(m20251005_000010_create_broadcast_tables::Migration),
            Box::new(m20251006_000011_create_chat_tables::Migration),
            Box::new(m20251006_000012_create_memo_tables::Migration),
            Box::new(m20251007_000013_add_assessment_attempt_index::Migration),
            Box::new(m20251008_000014_create_attendance_record_table::Migration),
            Box::new(m20251009_000015_create_reimbursement_tables::Migration),
            Box::new(m20251009_000016_create_inventory_tables::Migration),
        ]
    }
}

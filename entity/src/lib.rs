//! `SeaORM` entities for the hrdesk schema.

pub mod prelude;

pub mod assessment_plan;
pub mod assessment_plan_department;
pub mod assessment_result;
pub mod attendance_record;
pub mod broadcast;
pub mod broadcast_recipient;
pub mod broadcast_target;
pub mod chat_group;
pub mod chat_group_member;
pub mod chat_message;
pub mod conversion_rule;
pub mod department;
pub mod employee;
pub mod exam;
pub mod holiday;
pub mod inventory_audit;
pub mod inventory_item;
pub mod inventory_stock_log;
pub mod inventory_usage;
pub mod leave_record;
pub mod memo;
pub mod memo_recipient;
pub mod notification;
pub mod overtime_conversion;
pub mod overtime_record;
pub mod permission;
pub mod procurement_record;
pub mod reimbursement;
pub mod reimbursement_item;
pub mod reimbursement_log;
pub mod role;
pub mod role_department;
pub mod role_permission;
pub mod shift_schedule;
pub mod user;
pub mod user_role;
pub mod vacation_audit_log;
pub mod vacation_balance;
pub mod vacation_type;
pub mod work_shift;

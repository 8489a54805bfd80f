//! Re-exports of every entity under its `Entity` type name.

pub use super::assessment_plan::Entity as AssessmentPlan;
pub use super::assessment_plan_department::Entity as AssessmentPlanDepartment;
pub use super::assessment_result::Entity as AssessmentResult;
pub use super::attendance_record::Entity as AttendanceRecord;
pub use super::broadcast::Entity as Broadcast;
pub use super::broadcast_recipient::Entity as BroadcastRecipient;
pub use super::broadcast_target::Entity as BroadcastTarget;
pub use super::chat_group::Entity as ChatGroup;
pub use super::chat_group_member::Entity as ChatGroupMember;
pub use super::chat_message::Entity as ChatMessage;
pub use super::conversion_rule::Entity as ConversionRule;
pub use super::department::Entity as Department;
pub use super::employee::Entity as Employee;
pub use super::exam::Entity as Exam;
pub use super::holiday::Entity as Holiday;
pub use super::inventory_audit::Entity as InventoryAudit;
pub use super::inventory_item::Entity as InventoryItem;
pub use super::inventory_stock_log::Entity as InventoryStockLog;
pub use super::inventory_usage::Entity as InventoryUsage;
pub use super::leave_record::Entity as LeaveRecord;
pub use super::memo::Entity as Memo;
pub use super::memo_recipient::Entity as MemoRecipient;
pub use super::notification::Entity as Notification;
pub use super::overtime_conversion::Entity as OvertimeConversion;
pub use super::overtime_record::Entity as OvertimeRecord;
pub use super::permission::Entity as Permission;
pub use super::procurement_record::Entity as ProcurementRecord;
pub use super::reimbursement::Entity as Reimbursement;
pub use super::reimbursement_item::Entity as ReimbursementItem;
pub use super::reimbursement_log::Entity as ReimbursementLog;
pub use super::role::Entity as Role;
pub use super::role_department::Entity as RoleDepartment;
pub use super::role_permission::Entity as RolePermission;
pub use super::shift_schedule::Entity as ShiftSchedule;
pub use super::user::Entity as User;
pub use super::user_role::Entity as UserRole;
pub use super::vacation_audit_log::Entity as VacationAuditLog;
pub use super::vacation_balance::Entity as VacationBalance;
pub use super::vacation_type::Entity as VacationType;
pub use super::work_shift::Entity as WorkShift;

use std::collections::HashMap;

use crate::model::attendance::{LeaveDto, OvertimeDto};

/// Lifecycle of overtime and leave requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

pub fn overtime_into_dto(
    entity: entity::overtime_record::Model,
    employee_names: &HashMap<i32, String>,
) -> OvertimeDto {
    OvertimeDto {
        id: entity.id,
        employee_id: entity.employee_id,
        employee_name: employee_names.get(&entity.employee_id).cloned(),
        overtime_date: entity.overtime_date,
        start_time: entity.start_time,
        end_time: entity.end_time,
        hours: entity.hours,
        reason: entity.reason,
        status: entity.status,
        approver_id: entity.approver_id,
        approved_at: entity.approved_at,
        approval_note: entity.approval_note,
        created_at: entity.created_at,
    }
}

pub fn leave_into_dto(
    entity: entity::leave_record::Model,
    employee_names: &HashMap<i32, String>,
    type_names: &HashMap<i32, String>,
) -> LeaveDto {
    LeaveDto {
        id: entity.id,
        employee_id: entity.employee_id,
        employee_name: employee_names.get(&entity.employee_id).cloned(),
        vacation_type_id: entity.vacation_type_id,
        vacation_type_name: type_names.get(&entity.vacation_type_id).cloned(),
        start_date: entity.start_date,
        end_date: entity.end_date,
        days: entity.days,
        reason: entity.reason,
        status: entity.status,
        approver_id: entity.approver_id,
        approved_at: entity.approved_at,
        approval_note: entity.approval_note,
        created_at: entity.created_at,
    }
}

/// Filter shared by overtime and leave listings.
#[derive(Debug, Clone, Default)]
pub struct AttendanceFilter {
    pub employee_id: Option<i32>,
    pub status: Option<String>,
    /// Restricts to these employees; `None` means no restriction.
    pub employee_ids: Option<Vec<i32>>,
}

#[cfg(test)]
mod tests {
    use super::RequestStatus;

    #[test]
    fn status_parses_known_values() {
        for status in [
            RequestStatus::Pending,
            RequestStatus::Approved,
            RequestStatus::Rejected,
            RequestStatus::Cancelled,
        ] {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("done"), None);
    }
}

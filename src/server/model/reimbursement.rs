use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::model::reimbursement::{ReimbursementDto, ReimbursementItemDto, ReimbursementLogDto};

/// Lifecycle of a reimbursement claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Draft,
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ClaimStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn can_cancel(&self) -> bool {
        matches!(self, Self::Draft | Self::Pending)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, Self::Draft | Self::Cancelled)
    }
}

/// Entries written to a claim's status history.
pub mod action {
    pub const CREATE: &str = "create";
    pub const UPDATE: &str = "update";
    pub const SUBMIT: &str = "submit";
    pub const CANCEL: &str = "cancel";
    pub const APPROVE: &str = "approve";
    pub const REJECT: &str = "reject";
}

#[derive(Debug, Clone)]
pub struct ClaimItem {
    pub item_type: String,
    pub amount: Decimal,
    pub expense_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateClaimParams {
    pub employee_id: i32,
    pub user_id: i32,
    pub department_id: Option<i32>,
    pub title: String,
    pub kind: String,
    pub remark: Option<String>,
    pub status: ClaimStatus,
}

/// A status change to record against a claim.
#[derive(Debug, Clone)]
pub struct ClaimTransition {
    pub action: &'static str,
    pub from: Option<ClaimStatus>,
    pub to: ClaimStatus,
    pub operator_id: i32,
    pub opinion: Option<String>,
}

/// Claim number such as `BX20250602000042`.
pub fn claim_number(created_at: DateTime<Utc>, id: i32) -> String {
    format!("BX{}{:06}", created_at.format("%Y%m%d"), id)
}

pub fn total_amount(items: &[ClaimItem]) -> Decimal {
    items.iter().map(|i| i.amount).sum()
}

pub fn reimbursement_into_dto(
    entity: entity::reimbursement::Model,
    employee_names: &HashMap<i32, String>,
) -> ReimbursementDto {
    ReimbursementDto {
        id: entity.id,
        reimbursement_no: entity.reimbursement_no,
        employee_id: entity.employee_id,
        employee_name: employee_names.get(&entity.employee_id).cloned(),
        department_id: entity.department_id,
        title: entity.title,
        kind: entity.kind,
        total_amount: entity.total_amount,
        remark: entity.remark,
        status: entity.status,
        submitted_at: entity.submitted_at,
        approver_id: entity.approver_id,
        decided_at: entity.decided_at,
        opinion: entity.opinion,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    }
}

pub fn item_into_dto(entity: entity::reimbursement_item::Model) -> ReimbursementItemDto {
    ReimbursementItemDto {
        id: entity.id,
        item_type: entity.item_type,
        amount: entity.amount,
        expense_date: entity.expense_date,
        description: entity.description,
    }
}

pub fn log_into_dto(entity: entity::reimbursement_log::Model) -> ReimbursementLogDto {
    ReimbursementLogDto {
        id: entity.id,
        action: entity.action,
        from_status: entity.from_status,
        to_status: entity.to_status,
        operator_id: entity.operator_id,
        opinion: entity.opinion,
        created_at: entity.created_at,
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn numbers_claims_by_day_and_id() {
        let at = Utc.with_ymd_and_hms(2025, 6, 2, 9, 30, 0).unwrap();

        assert_eq!(claim_number(at, 42), "BX20250602000042");
    }

    #[test]
    fn sums_items_exactly() {
        let item = |amount: &str| ClaimItem {
            item_type: "taxi".to_string(),
            amount: amount.parse().unwrap(),
            expense_date: None,
            description: None,
        };

        let total = total_amount(&[item("0.10"), item("0.20"), item("12.35")]);

        assert_eq!(total.to_string(), "12.65");
    }

    #[test]
    fn only_open_claims_cancel() {
        assert!(ClaimStatus::Draft.can_cancel());
        assert!(ClaimStatus::Pending.can_cancel());
        assert!(!ClaimStatus::Approved.can_cancel());
        assert!(ClaimStatus::Cancelled.can_delete());
        assert!(!ClaimStatus::Pending.can_delete());
    }
}

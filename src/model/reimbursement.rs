use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// One expense line. Amounts travel as decimal strings, e.g. `"128.50"`.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ReimbursementItemInputDto {
    pub item_type: String,
    pub amount: Decimal,
    pub expense_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct CreateReimbursementDto {
    pub title: String,
    /// Expense category such as `travel` or `office`.
    pub kind: String,
    pub remark: Option<String>,
    pub items: Vec<ReimbursementItemInputDto>,
    /// Submit for approval right away instead of saving a draft.
    #[serde(default)]
    pub submit: bool,
}

/// Replaces the title, kind, remark and every item of a draft.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct UpdateReimbursementDto {
    pub title: String,
    pub kind: String,
    pub remark: Option<String>,
    pub items: Vec<ReimbursementItemInputDto>,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ReimbursementDecisionDto {
    /// `approve` or `reject`.
    pub action: String,
    pub opinion: Option<String>,
}

#[derive(Deserialize, IntoParams, Clone, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct ReimbursementFilterDto {
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ReimbursementDto {
    pub id: i32,
    pub reimbursement_no: Option<String>,
    pub employee_id: i32,
    pub employee_name: Option<String>,
    pub department_id: Option<i32>,
    pub title: String,
    pub kind: String,
    pub total_amount: Decimal,
    pub remark: Option<String>,
    pub status: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub approver_id: Option<i32>,
    pub decided_at: Option<DateTime<Utc>>,
    pub opinion: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ReimbursementItemDto {
    pub id: i32,
    pub item_type: String,
    pub amount: Decimal,
    pub expense_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ReimbursementLogDto {
    pub id: i32,
    pub action: String,
    pub from_status: Option<String>,
    pub to_status: String,
    pub operator_id: i32,
    pub opinion: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A claim with its expense lines and status history.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ReimbursementDetailDto {
    pub reimbursement: ReimbursementDto,
    pub items: Vec<ReimbursementItemDto>,
    pub logs: Vec<ReimbursementLogDto>,
}

//! Expense reimbursement claims and their approval.
//!
//! Every status change runs in one transaction with its history row, so a claim's
//! log always explains its current status. Claims hold exact decimal amounts.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{PageDto, PaginationParams},
        notification::NotificationDto,
        reimbursement::{
            CreateReimbursementDto, ReimbursementDecisionDto, ReimbursementDetailDto,
            ReimbursementDto, ReimbursementFilterDto, ReimbursementItemInputDto,
            UpdateReimbursementDto,
        },
    },
    server::{
        data::{
            employee::EmployeeRepository,
            reimbursement::{ClaimFilter, ReimbursementRepository},
        },
        error::{auth::AuthError, AppError},
        middleware::auth::{CurrentUser, Permission},
        model::{
            notification::{kind, CreateNotificationParams},
            reimbursement::{
                action, item_into_dto, log_into_dto, reimbursement_into_dto, ClaimItem,
                ClaimStatus, ClaimTransition, CreateClaimParams,
            },
        },
        service::notification::notify,
        util::validate::{optional_text, required_text},
    },
};

const TITLE_MAX_CHARS: usize = 200;
const KIND_MAX_CHARS: usize = 50;
const REMARK_MAX_CHARS: usize = 500;
const MAX_ITEMS: usize = 50;
const AMOUNT_MAX_SCALE: u32 = 2;

pub struct ReimbursementService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ReimbursementService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a draft for the caller, submitting it right away when asked.
    pub async fn create(
        &self,
        current: &CurrentUser,
        dto: CreateReimbursementDto,
    ) -> Result<ReimbursementDetailDto, AppError> {
        let employee = EmployeeRepository::new(self.db)
            .find_by_user_id(current.id())
            .await?
            .ok_or_else(|| AppError::bad_request("The current user has no employee record"))?;
        let items = validate_items(dto.items)?;
        let params = CreateClaimParams {
            employee_id: employee.id,
            user_id: current.id(),
            department_id: current.user.department_id,
            title: required_text("title", &dto.title, TITLE_MAX_CHARS)?,
            kind: required_text("kind", &dto.kind, KIND_MAX_CHARS)?,
            remark: optional_text("remark", dto.remark, REMARK_MAX_CHARS)?,
            status: ClaimStatus::Draft,
        };

        let txn = self.db.begin().await?;
        let repo = ReimbursementRepository::new(&txn);
        let mut claim = repo.create(params, &items).await?;
        repo.log(
            claim.id,
            ClaimTransition {
                action: action::CREATE,
                from: None,
                to: ClaimStatus::Draft,
                operator_id: current.id(),
                opinion: None,
            },
            claim.created_at,
        )
        .await?;
        if dto.submit {
            claim = self
                .move_claim(
                    &txn,
                    current,
                    claim.id,
                    ClaimStatus::Draft,
                    ClaimStatus::Pending,
                    action::SUBMIT,
                )
                .await?;
        }
        let detail = detail(&txn, claim).await?;
        txn.commit().await?;

        tracing::info!(
            claim_id = detail.reimbursement.id,
            total = %detail.reimbursement.total_amount,
            "reimbursement created"
        );
        Ok(detail)
    }

    /// The caller's own claims, newest first.
    pub async fn list_mine(
        &self,
        current: &CurrentUser,
        filter: ReimbursementFilterDto,
        pagination: PaginationParams,
    ) -> Result<PageDto<ReimbursementDto>, AppError> {
        let status = validate_status(filter.status)?;
        self.page(
            ClaimFilter {
                user_id: Some(current.id()),
                status,
                department_ids: None,
            },
            pagination,
        )
        .await
    }

    /// Pending claims in the approver's department scope.
    pub async fn pending(
        &self,
        current: &CurrentUser,
        pagination: PaginationParams,
    ) -> Result<PageDto<ReimbursementDto>, AppError> {
        current.require(Permission::ReimbursementApprove)?;
        self.page(
            ClaimFilter {
                user_id: None,
                status: Some(ClaimStatus::Pending.as_str().to_string()),
                department_ids: current.scope.department_ids(),
            },
            pagination,
        )
        .await
    }

    /// A claim with items and history. Visible to its owner and to approvers in scope.
    pub async fn get(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<ReimbursementDetailDto, AppError> {
        let claim = self.claim(id).await?;
        if claim.user_id != current.id() {
            current.require(Permission::ReimbursementApprove)?;
            current.require_visible(claim.department_id, claim.user_id)?;
        }
        detail(self.db, claim).await
    }

    /// Replaces a draft's content. Only the owner may edit.
    pub async fn update(
        &self,
        current: &CurrentUser,
        id: i32,
        dto: UpdateReimbursementDto,
    ) -> Result<ReimbursementDetailDto, AppError> {
        let claim = self.owned_claim(current, id).await?;
        let items = validate_items(dto.items)?;
        let title = required_text("title", &dto.title, TITLE_MAX_CHARS)?;
        let kind = required_text("kind", &dto.kind, KIND_MAX_CHARS)?;
        let remark = optional_text("remark", dto.remark, REMARK_MAX_CHARS)?;

        let txn = self.db.begin().await?;
        let repo = ReimbursementRepository::new(&txn);
        let updated = repo
            .update_draft(claim.id, title, kind, remark, &items)
            .await?
            .ok_or_else(|| AppError::bad_request("Only drafts can be edited"))?;
        repo.log(
            claim.id,
            ClaimTransition {
                action: action::UPDATE,
                from: Some(ClaimStatus::Draft),
                to: ClaimStatus::Draft,
                operator_id: current.id(),
                opinion: None,
            },
            updated.updated_at,
        )
        .await?;
        let detail = detail(&txn, updated).await?;
        txn.commit().await?;

        Ok(detail)
    }

    pub async fn submit(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<ReimbursementDetailDto, AppError> {
        let claim = self.owned_claim(current, id).await?;

        let txn = self.db.begin().await?;
        let submitted = self
            .move_claim(
                &txn,
                current,
                claim.id,
                ClaimStatus::Draft,
                ClaimStatus::Pending,
                action::SUBMIT,
            )
            .await?;
        let detail = detail(&txn, submitted).await?;
        txn.commit().await?;

        Ok(detail)
    }

    /// Withdraws a draft or pending claim.
    pub async fn cancel(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<ReimbursementDetailDto, AppError> {
        let claim = self.owned_claim(current, id).await?;
        let from = ClaimStatus::parse(&claim.status)
            .filter(|s| s.can_cancel())
            .ok_or_else(|| AppError::bad_request("Only draft or pending claims can be cancelled"))?;

        let txn = self.db.begin().await?;
        let cancelled = self
            .move_claim(&txn, current, claim.id, from, ClaimStatus::Cancelled, action::CANCEL)
            .await?;
        let detail = detail(&txn, cancelled).await?;
        txn.commit().await?;

        Ok(detail)
    }

    /// Deletes a draft or cancelled claim with its items and history.
    pub async fn delete(&self, current: &CurrentUser, id: i32) -> Result<(), AppError> {
        let claim = self.owned_claim(current, id).await?;
        if !ClaimStatus::parse(&claim.status).is_some_and(|s| s.can_delete()) {
            return Err(AppError::bad_request(
                "Only draft or cancelled claims can be deleted",
            ));
        }

        let txn = self.db.begin().await?;
        ReimbursementRepository::new(&txn).delete(claim.id).await?;
        txn.commit().await?;

        tracing::info!(claim_id = claim.id, "reimbursement deleted");
        Ok(())
    }

    /// Approves or rejects a pending claim and notifies the claimant.
    ///
    /// The notification is returned for pushing after commit.
    pub async fn decide(
        &self,
        current: &CurrentUser,
        id: i32,
        dto: ReimbursementDecisionDto,
    ) -> Result<(ReimbursementDetailDto, NotificationDto), AppError> {
        current.require(Permission::ReimbursementApprove)?;
        let (to, log_action) = match dto.action.as_str() {
            "approve" => (ClaimStatus::Approved, action::APPROVE),
            "reject" => (ClaimStatus::Rejected, action::REJECT),
            other => {
                return Err(AppError::bad_request(format!("Unknown action {}", other)));
            }
        };
        let opinion = optional_text("opinion", dto.opinion, REMARK_MAX_CHARS)?;

        let claim = self.claim(id).await?;
        current.require_visible(claim.department_id, claim.user_id)?;
        if claim.user_id == current.id() {
            return Err(AppError::bad_request("You cannot decide your own claim"));
        }

        let txn = self.db.begin().await?;
        let repo = ReimbursementRepository::new(&txn);
        let decided = repo
            .transition(
                claim.id,
                ClaimStatus::Pending,
                to,
                Some(current.id()),
                opinion.clone(),
            )
            .await?
            .ok_or_else(|| AppError::bad_request("Only pending claims can be decided"))?;
        repo.log(
            claim.id,
            ClaimTransition {
                action: log_action,
                from: Some(ClaimStatus::Pending),
                to,
                operator_id: current.id(),
                opinion,
            },
            decided.updated_at,
        )
        .await?;

        let verdict = if to == ClaimStatus::Approved {
            "approved"
        } else {
            "rejected"
        };
        let notification = notify(
            &txn,
            CreateNotificationParams {
                user_id: decided.user_id,
                kind: kind::REIMBURSEMENT_APPROVAL.to_string(),
                title: format!("Reimbursement {}", verdict),
                content: format!(
                    "Your claim {} ({}) was {}",
                    decided.reimbursement_no.as_deref().unwrap_or_default(),
                    decided.total_amount,
                    verdict
                ),
                related_type: Some("reimbursement".to_string()),
                related_id: Some(decided.id),
            },
        )
        .await?;
        let detail = detail(&txn, decided).await?;
        txn.commit().await?;

        tracing::info!(claim_id = id, approver_id = current.id(), verdict, "reimbursement decided");
        Ok((detail, notification))
    }

    /// Runs a conditional transition and records it in the claim's history.
    async fn move_claim<C: ConnectionTrait>(
        &self,
        db: &C,
        current: &CurrentUser,
        id: i32,
        from: ClaimStatus,
        to: ClaimStatus,
        log_action: &'static str,
    ) -> Result<entity::reimbursement::Model, AppError> {
        let repo = ReimbursementRepository::new(db);
        let moved = repo
            .transition(id, from, to, None, None)
            .await?
            .ok_or_else(|| {
                AppError::bad_request(format!(
                    "Only {} claims can be changed this way",
                    from.as_str()
                ))
            })?;
        repo.log(
            id,
            ClaimTransition {
                action: log_action,
                from: Some(from),
                to,
                operator_id: current.id(),
                opinion: None,
            },
            Utc::now(),
        )
        .await?;
        Ok(moved)
    }

    async fn page(
        &self,
        filter: ClaimFilter,
        pagination: PaginationParams,
    ) -> Result<PageDto<ReimbursementDto>, AppError> {
        let per_page = pagination.per_page();
        let (claims, total) = ReimbursementRepository::new(self.db)
            .get_paginated(&filter, pagination.page, per_page)
            .await?;

        let employee_ids: Vec<i32> = claims.iter().map(|c| c.employee_id).collect();
        let names = EmployeeRepository::new(self.db).names(&employee_ids).await?;

        Ok(PageDto::new(
            claims
                .into_iter()
                .map(|c| reimbursement_into_dto(c, &names))
                .collect(),
            total,
            pagination.page,
            per_page,
        ))
    }

    async fn claim(&self, id: i32) -> Result<entity::reimbursement::Model, AppError> {
        ReimbursementRepository::new(self.db)
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Reimbursement not found"))
    }

    async fn owned_claim(
        &self,
        current: &CurrentUser,
        id: i32,
    ) -> Result<entity::reimbursement::Model, AppError> {
        let claim = self.claim(id).await?;
        if claim.user_id != current.id() {
            return Err(AuthError::AccessDenied(
                current.id(),
                format!("reimbursement {} belongs to another user", id),
            )
            .into());
        }
        Ok(claim)
    }
}

async fn detail<C: ConnectionTrait>(
    db: &C,
    claim: entity::reimbursement::Model,
) -> Result<ReimbursementDetailDto, AppError> {
    let repo = ReimbursementRepository::new(db);
    let items = repo.items(claim.id).await?;
    let logs = repo.logs(claim.id).await?;
    let names = EmployeeRepository::new(db).names(&[claim.employee_id]).await?;

    Ok(ReimbursementDetailDto {
        reimbursement: reimbursement_into_dto(claim, &names),
        items: items.into_iter().map(item_into_dto).collect(),
        logs: logs.into_iter().map(log_into_dto).collect(),
    })
}

fn validate_status(status: Option<String>) -> Result<Option<String>, AppError> {
    match status {
        Some(s) if ClaimStatus::parse(&s).is_none() => {
            Err(AppError::bad_request(format!("Unknown status {}", s)))
        }
        other => Ok(other),
    }
}

/// Requires at least one item, each with a positive amount of at most two decimals.
fn validate_items(items: Vec<ReimbursementItemInputDto>) -> Result<Vec<ClaimItem>, AppError> {
    if items.is_empty() {
        return Err(AppError::bad_request("At least one expense item is required"));
    }
    if items.len() > MAX_ITEMS {
        return Err(AppError::bad_request(format!(
            "A claim holds at most {} items",
            MAX_ITEMS
        )));
    }

    items
        .into_iter()
        .map(|item| {
            if item.amount <= Decimal::ZERO {
                return Err(AppError::bad_request("Item amounts must be positive"));
            }
            if item.amount.normalize().scale() > AMOUNT_MAX_SCALE {
                return Err(AppError::bad_request(
                    "Item amounts have at most two decimal places",
                ));
            }
            Ok(ClaimItem {
                item_type: required_text("item_type", &item.item_type, KIND_MAX_CHARS)?,
                amount: item.amount,
                expense_date: item.expense_date,
                description: optional_text("description", item.description, REMARK_MAX_CHARS)?,
            })
        })
        .collect()
}

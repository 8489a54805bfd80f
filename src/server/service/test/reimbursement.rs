use super::*;
use crate::{
    model::{
        api::PaginationParams,
        reimbursement::{
            CreateReimbursementDto, ReimbursementDecisionDto, ReimbursementFilterDto,
            ReimbursementItemInputDto, UpdateReimbursementDto,
        },
    },
    server::service::reimbursement::ReimbursementService,
};
use rust_decimal::Decimal;

fn amount(value: &str) -> Decimal {
    value.parse().unwrap()
}

fn item(value: &str) -> ReimbursementItemInputDto {
    ReimbursementItemInputDto {
        item_type: "taxi".to_string(),
        amount: amount(value),
        expense_date: None,
        description: None,
    }
}

fn claim(items: Vec<ReimbursementItemInputDto>, submit: bool) -> CreateReimbursementDto {
    CreateReimbursementDto {
        title: "Client visit".to_string(),
        kind: "travel".to_string(),
        remark: None,
        items,
        submit,
    }
}

fn decision(action: &str) -> ReimbursementDecisionDto {
    ReimbursementDecisionDto {
        action: action.to_string(),
        opinion: Some("ok".to_string()),
    }
}

/// Tests a new claim sums its items exactly and is numbered from its id.
///
/// Expected: draft with total 20.00, a BX number and one history row
#[tokio::test]
async fn create_totals_items() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_reimbursement_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let current = login_as(db, session, user.id).await?;
    let service = ReimbursementService::new(db);

    let created = service
        .create(&current, claim(vec![item("12.30"), item("7.70")], false))
        .await?;

    let claim_dto = &created.reimbursement;
    assert_eq!(claim_dto.status, "draft");
    assert_eq!(claim_dto.employee_id, employee.id);
    assert_eq!(claim_dto.total_amount, amount("20.00"));
    let number = claim_dto.reimbursement_no.clone().unwrap();
    assert!(number.starts_with("BX"));
    assert!(number.ends_with(&format!("{:06}", claim_dto.id)));
    assert_eq!(created.items.len(), 2);
    assert_eq!(created.logs.len(), 1);
    assert_eq!(created.logs[0].action, "create");

    Ok(())
}

/// Tests claims without items, with non-positive amounts or sub-cent amounts.
///
/// Expected: Err(AppError::BadRequest) for each
#[tokio::test]
async fn rejects_invalid_items() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_reimbursement_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let current = login_as(db, session, user.id).await?;
    let service = ReimbursementService::new(db);

    for items in [vec![], vec![item("0")], vec![item("-5.00")], vec![item("1.005")]] {
        let result = service.create(&current, claim(items, false)).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    Ok(())
}

/// Tests submitting, approving and the claimant's notification.
///
/// Expected: approved once, later transitions rejected, full history kept
#[tokio::test]
async fn approval_notifies_claimant() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_reimbursement_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let approver = manager_of(db, department.id, &["reimbursement:approve"]).await?;
    let (claimant, _) =
        factory::helpers::create_employee_with_user(db, Some(department.id)).await?;
    let service = ReimbursementService::new(db);

    let current = login_as(db, session, claimant.id).await?;
    let created = service
        .create(&current, claim(vec![item("88.00")], true))
        .await?;
    assert_eq!(created.reimbursement.status, "pending");
    assert!(created.reimbursement.submitted_at.is_some());

    let current = login_as(db, session, approver.id).await?;
    let pending = service
        .pending(&current, PaginationParams::default())
        .await?;
    assert_eq!(pending.total, 1);

    let (approved, notification) = service
        .decide(&current, created.reimbursement.id, decision("approve"))
        .await?;
    assert_eq!(approved.reimbursement.status, "approved");
    assert_eq!(approved.reimbursement.approver_id, Some(approver.id));
    assert_eq!(notification.user_id, claimant.id);
    assert_eq!(notification.kind, "reimbursement_approval");
    let actions: Vec<&str> = approved.logs.iter().map(|l| l.action.as_str()).collect();
    assert_eq!(actions, vec!["create", "submit", "approve"]);

    let again = service
        .decide(&current, created.reimbursement.id, decision("reject"))
        .await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let current = login_as(db, session, claimant.id).await?;
    let cancel = service.cancel(&current, created.reimbursement.id).await;
    assert!(matches!(cancel, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests two approvers deciding the same claim at once.
///
/// Expected: exactly one decision succeeds
#[tokio::test]
async fn concurrent_decisions_apply_once() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_reimbursement_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let approver = manager_of(db, department.id, &["reimbursement:approve"]).await?;
    let (claimant, _) =
        factory::helpers::create_employee_with_user(db, Some(department.id)).await?;
    let service = ReimbursementService::new(db);

    let current = login_as(db, session, claimant.id).await?;
    let created = service
        .create(&current, claim(vec![item("10.00")], true))
        .await?;

    let current = login_as(db, session, approver.id).await?;
    let (first, second) = tokio::join!(
        service.decide(&current, created.reimbursement.id, decision("approve")),
        service.decide(&current, created.reimbursement.id, decision("reject")),
    );

    let outcomes = [first.is_ok(), second.is_ok()];
    assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    assert!(
        matches!(first, Err(AppError::BadRequest(_)))
            || matches!(second, Err(AppError::BadRequest(_)))
    );

    Ok(())
}

/// Tests approvers cannot decide their own claims.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn refuses_self_approval() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_reimbursement_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let approver = manager_of(db, department.id, &["reimbursement:approve"]).await?;
    factory::create_employee(db, approver.id).await?;
    let current = login_as(db, session, approver.id).await?;
    let service = ReimbursementService::new(db);

    let created = service
        .create(&current, claim(vec![item("10.00")], true))
        .await?;
    let result = service
        .decide(&current, created.reimbursement.id, decision("approve"))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests drafts can be edited, then cancelled and deleted only by their owner.
///
/// Expected: items replaced, edits after submit rejected, claim gone after delete
#[tokio::test]
async fn draft_lifecycle() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_reimbursement_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (owner, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let (other, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let service = ReimbursementService::new(db);

    let current = login_as(db, session, owner.id).await?;
    let created = service
        .create(&current, claim(vec![item("5.00"), item("6.00")], false))
        .await?;
    let id = created.reimbursement.id;
    let edit = || UpdateReimbursementDto {
        title: "Client visit, revised".to_string(),
        kind: "travel".to_string(),
        remark: Some("Receipts attached on paper".to_string()),
        items: vec![item("42.50")],
    };

    let updated = service.update(&current, id, edit()).await?;
    assert_eq!(updated.items.len(), 1);
    assert_eq!(updated.reimbursement.total_amount, amount("42.50"));

    let current = login_as(db, session, other.id).await?;
    let foreign = service.update(&current, id, edit()).await;
    assert!(matches!(foreign, Err(AppError::AuthErr(_))));

    let current = login_as(db, session, owner.id).await?;
    service.submit(&current, id).await?;
    let late_edit = service.update(&current, id, edit()).await;
    assert!(matches!(late_edit, Err(AppError::BadRequest(_))));
    let pending_delete = service.delete(&current, id).await;
    assert!(matches!(pending_delete, Err(AppError::BadRequest(_))));

    let cancelled = service.cancel(&current, id).await?;
    assert_eq!(cancelled.reimbursement.status, "cancelled");
    service.delete(&current, id).await?;

    let gone = service.get(&current, id).await;
    assert!(matches!(gone, Err(AppError::NotFound(_))));
    let mine = service
        .list_mine(
            &current,
            ReimbursementFilterDto::default(),
            PaginationParams::default(),
        )
        .await?;
    assert_eq!(mine.total, 0);

    Ok(())
}

use super::*;

/// Tests an approval records the approver and decision time.
///
/// Expected: status approved with approver and timestamp set
#[tokio::test]
async fn records_approval() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let approver = factory::create_user(db).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = LeaveRepository::new(db);
    let record = repo.create(leave(employee.id, annual.id, 10, 11)).await?;
    assert_eq!(record.status, RequestStatus::Pending.as_str());

    let decided = repo
        .decide(
            record.id,
            Decision {
                status: RequestStatus::Approved,
                approver_id: Some(approver.id),
                note: Some("enjoy".to_string()),
            },
        )
        .await?
        .unwrap();

    assert_eq!(decided.status, "approved");
    assert_eq!(decided.approver_id, Some(approver.id));
    assert!(decided.approved_at.is_some());
    assert_eq!(decided.approval_note.as_deref(), Some("enjoy"));

    Ok(())
}

/// Tests a cancellation carries no decision time.
///
/// Expected: status cancelled, approved_at empty
#[tokio::test]
async fn cancellation_has_no_decision_time() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = LeaveRepository::new(db);
    let record = repo.create(leave(employee.id, annual.id, 10, 11)).await?;
    let cancelled = repo
        .decide(
            record.id,
            Decision {
                status: RequestStatus::Cancelled,
                approver_id: None,
                note: None,
            },
        )
        .await?
        .unwrap();

    assert_eq!(cancelled.status, "cancelled");
    assert!(cancelled.approved_at.is_none());

    Ok(())
}

/// Tests a second decision on the same record does not overwrite the first.
///
/// Expected: None for the second call and the record keeps the first outcome
#[tokio::test]
async fn second_decision_is_ignored() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = LeaveRepository::new(db);
    let record = repo.create(leave(employee.id, annual.id, 10, 11)).await?;
    let decision = |status| Decision {
        status,
        approver_id: None,
        note: None,
    };

    assert!(repo
        .decide(record.id, decision(RequestStatus::Approved))
        .await?
        .is_some());
    assert!(repo
        .decide(record.id, decision(RequestStatus::Rejected))
        .await?
        .is_none());

    let stored = repo.find_by_id(record.id).await?.unwrap();
    assert_eq!(stored.status, "approved");

    Ok(())
}

use super::*;

/// Tests a pending leave blocks an intersecting range.
///
/// Verifies ranges touching on a single day overlap, disjoint ranges do not.
///
/// Expected: overlap on shared day, none for the following week
#[tokio::test]
async fn detects_intersecting_range() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = LeaveRepository::new(db);
    repo.create(leave(employee.id, annual.id, 2, 4)).await?;

    let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
    assert!(repo.has_overlap(employee.id, day(4), day(6)).await?);
    assert!(!repo.has_overlap(employee.id, day(5), day(9)).await?);

    Ok(())
}

/// Tests rejected and cancelled leaves free their range.
///
/// Expected: no overlap once the only record is rejected
#[tokio::test]
async fn ignores_rejected_leave() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = LeaveRepository::new(db);
    let record = repo.create(leave(employee.id, annual.id, 2, 4)).await?;
    repo.decide(
        record.id,
        Decision {
            status: RequestStatus::Rejected,
            approver_id: None,
            note: None,
        },
    )
    .await?;

    let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
    assert!(!repo.has_overlap(employee.id, day(1), day(30)).await?);

    Ok(())
}

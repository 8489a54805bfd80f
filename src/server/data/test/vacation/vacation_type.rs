use super::*;

/// Tests disabled types are hidden when only enabled types are requested.
///
/// Expected: enabled listing skips the disabled type, full listing keeps sort order
#[tokio::test]
async fn lists_enabled_by_sort_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let second = factory::vacation::VacationTypeFactory::new(db)
        .sort_order(2)
        .build()
        .await?;
    let first = factory::vacation::VacationTypeFactory::new(db)
        .sort_order(1)
        .build()
        .await?;
    let disabled = factory::vacation::VacationTypeFactory::new(db)
        .sort_order(0)
        .enabled(false)
        .build()
        .await?;

    let repo = VacationTypeRepository::new(db);
    let enabled: Vec<i32> = repo.list(true).await?.into_iter().map(|t| t.id).collect();
    let all: Vec<i32> = repo.list(false).await?.into_iter().map(|t| t.id).collect();

    assert_eq!(enabled, vec![first.id, second.id]);
    assert_eq!(all, vec![disabled.id, first.id, second.id]);
    assert_eq!(repo.max_sort_order().await?, Some(2));

    Ok(())
}

/// Tests references from holidays and balances are counted.
///
/// Expected: one holiday plus one balance
#[tokio::test]
async fn counts_references() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    let unused = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 2).await?;
    BalanceRepository::new(db)
        .create(employee.id, 2025, annual.id, 2.0)
        .await?;

    let repo = VacationTypeRepository::new(db);

    assert_eq!(repo.count_references(annual.id).await?, 2);
    assert_eq!(repo.count_references(unused.id).await?, 0);

    Ok(())
}

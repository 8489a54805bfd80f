use super::*;

/// Tests the statutory entitlement sums every entry of the year and type.
///
/// Verifies entries of other years and other types are not counted.
///
/// Expected: 3 + 2 days
#[tokio::test]
async fn sums_days_for_year_and_type() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let annual = factory::create_vacation_type(db).await?;
    let sick = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 3).await?;
    factory::vacation::create_holiday_in_month(db, annual.id, 2025, 10, 2).await?;
    factory::create_holiday(db, annual.id, 2024, 7).await?;
    factory::create_holiday(db, sick.id, 2025, 4).await?;

    let repo = HolidayRepository::new(db);

    assert_eq!(repo.sum_days(2025, annual.id).await?, 5);
    assert_eq!(repo.sum_days(2023, annual.id).await?, 0);

    Ok(())
}

/// Tests monthly totals group entries by month.
///
/// Expected: one row per month carrying day sum and entry count
#[tokio::test]
async fn groups_monthly_totals() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let annual = factory::create_vacation_type(db).await?;
    factory::vacation::create_holiday_in_month(db, annual.id, 2025, 5, 1).await?;
    factory::vacation::create_holiday_in_month(db, annual.id, 2025, 5, 2).await?;
    factory::vacation::create_holiday_in_month(db, annual.id, 2025, 10, 7).await?;

    let mut totals = HolidayRepository::new(db).monthly_totals(2025).await?;
    totals.sort_by_key(|(month, _, _)| *month);

    assert_eq!(totals, vec![(5, Some(3), 2), (10, Some(7), 1)]);

    Ok(())
}

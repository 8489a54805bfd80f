use super::*;

/// Tests a new balance row starts with only the statutory component.
///
/// Expected: converted, adjusted and used are zero
#[tokio::test]
async fn creates_with_total_only() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = BalanceRepository::new(db);
    let balance = repo.create(employee.id, 2025, annual.id, 5.0).await?;

    assert_eq!(
        BalanceComponents::from(&balance),
        BalanceComponents {
            total_days: 5.0,
            converted_days: 0.0,
            adjusted_days: 0.0,
            used_days: 0.0,
        }
    );
    assert!(repo.find(employee.id, 2025, annual.id).await?.is_some());
    assert!(repo.find(employee.id, 2024, annual.id).await?.is_none());

    Ok(())
}

/// Tests every component is overwritten.
///
/// Expected: stored values equal the supplied components
#[tokio::test]
async fn sets_components() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;

    let repo = BalanceRepository::new(db);
    let balance = repo.create(employee.id, 2025, annual.id, 5.0).await?;
    let components = BalanceComponents {
        total_days: 5.0,
        converted_days: 1.5,
        adjusted_days: -1.0,
        used_days: 2.0,
    };
    repo.set_components(balance, components).await?;

    let stored = repo.find(employee.id, 2025, annual.id).await?.unwrap();
    assert_eq!(BalanceComponents::from(&stored), components);

    Ok(())
}

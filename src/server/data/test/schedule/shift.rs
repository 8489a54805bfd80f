use super::*;

/// Tests the rest shift is created once and reused.
///
/// Expected: same id on both calls, flagged as rest
#[tokio::test]
async fn reuses_rest_shift() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ShiftRepository::new(db);
    let first = repo.get_or_create_rest_shift().await?;
    let second = repo.get_or_create_rest_shift().await?;

    assert_eq!(first.id, second.id);
    assert!(first.is_rest);
    assert_eq!(first.name, REST_SHIFT_NAME);
    assert_eq!(first.department_id, None);

    Ok(())
}

/// Tests department shifts are only visible to that department.
///
/// Expected: global shift plus the department's own shift
#[tokio::test]
async fn lists_global_and_department_shifts() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let own = factory::create_department(db).await?;
    let other = factory::create_department(db).await?;
    let global = factory::create_shift(db).await?;
    let own_shift = factory::shift::WorkShiftFactory::new(db)
        .hours("10:00", "18:00")
        .department_id(Some(own.id))
        .build()
        .await?;
    factory::shift::WorkShiftFactory::new(db)
        .hours("11:00", "19:00")
        .department_id(Some(other.id))
        .build()
        .await?;

    let repo = ShiftRepository::new(db);
    let visible: Vec<i32> = repo
        .list_visible(Some(&[own.id]))
        .await?
        .into_iter()
        .map(|s| s.id)
        .collect();

    assert_eq!(visible, vec![global.id, own_shift.id]);
    assert_eq!(repo.list_visible(None).await?.len(), 3);

    Ok(())
}

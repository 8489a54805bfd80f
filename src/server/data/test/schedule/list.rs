use super::*;

/// Tests the date range is inclusive at both ends.
///
/// Expected: rows on the first and last day are included, outside rows are not
#[tokio::test]
async fn includes_range_bounds() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let shift = factory::create_shift(db).await?;

    let repo = ScheduleRepository::new(db);
    for day in [1, 5, 10, 11] {
        repo.upsert(ScheduleEntry {
            employee_id: employee.id,
            schedule_date: date(day),
            shift_id: shift.id,
            is_rest_day: false,
            note: None,
        })
        .await?;
    }

    let rows = repo
        .list(&ScheduleFilter {
            start_date: date(5),
            end_date: date(10),
            employee_ids: None,
        })
        .await?;
    let dates: Vec<NaiveDate> = rows.iter().map(|r| r.schedule_date).collect();

    assert_eq!(dates, vec![date(5), date(10)]);

    Ok(())
}

/// Tests filtering by employee ids.
///
/// Expected: only the requested employee's rows
#[tokio::test]
async fn filters_by_employee() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, alice) = factory::helpers::create_employee_with_user(db, None).await?;
    let (_, bob) = factory::helpers::create_employee_with_user(db, None).await?;
    let shift = factory::create_shift(db).await?;

    let repo = ScheduleRepository::new(db);
    for employee_id in [alice.id, bob.id] {
        repo.upsert(ScheduleEntry {
            employee_id,
            schedule_date: date(2),
            shift_id: shift.id,
            is_rest_day: false,
            note: None,
        })
        .await?;
    }

    let rows = repo
        .list(&ScheduleFilter {
            start_date: date(1),
            end_date: date(31),
            employee_ids: Some(vec![bob.id]),
        })
        .await?;

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].employee_id, bob.id);

    Ok(())
}

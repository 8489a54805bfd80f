use super::*;

/// Tests a second upsert for the same employee and day replaces the shift.
///
/// Verifies no duplicate row is created.
///
/// Expected: one row holding the latest shift
#[tokio::test]
async fn replaces_shift_for_same_day() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let early = factory::create_shift(db).await?;
    let late = factory::shift::WorkShiftFactory::new(db)
        .hours("14:00", "22:00")
        .build()
        .await?;

    let repo = ScheduleRepository::new(db);
    let first = repo
        .upsert(ScheduleEntry {
            employee_id: employee.id,
            schedule_date: date(3),
            shift_id: early.id,
            is_rest_day: false,
            note: None,
        })
        .await?;
    let second = repo
        .upsert(ScheduleEntry {
            employee_id: employee.id,
            schedule_date: date(3),
            shift_id: late.id,
            is_rest_day: false,
            note: Some("swap".to_string()),
        })
        .await?;

    assert_eq!(first.id, second.id);
    assert_eq!(second.shift_id, late.id);
    assert_eq!(second.note.as_deref(), Some("swap"));

    let rows = repo
        .list(&ScheduleFilter {
            start_date: date(1),
            end_date: date(31),
            employee_ids: None,
        })
        .await?;
    assert_eq!(rows.len(), 1);

    Ok(())
}

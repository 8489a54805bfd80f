use super::*;
use crate::{
    model::schedule::{BatchScheduleDto, CopySchedulesDto, UpsertScheduleDto},
    server::{
        data::schedule::ScheduleRepository, model::schedule::ScheduleFilter,
        service::schedule::ScheduleService,
    },
};
use chrono::NaiveDate;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
}

fn entry(employee_id: i32, d: u32, shift_id: i32) -> UpsertScheduleDto {
    UpsertScheduleDto {
        employee_id,
        schedule_date: day(d),
        shift_id,
        note: None,
    }
}

/// Tests a batch writes one row per employee and date, replacing earlier entries.
///
/// Expected: two rows, the repeated date carrying the later shift
#[tokio::test]
async fn batch_upsert_replaces_same_day() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let morning = factory::create_shift(db).await?;
    let night = factory::shift::WorkShiftFactory::new(db)
        .hours("22:00", "06:00")
        .build()
        .await?;
    let current = login_as(db, session, admin.id).await?;

    let service = ScheduleService::new(db);
    service
        .batch_upsert(
            &current,
            BatchScheduleDto {
                entries: vec![
                    entry(employee.id, 3, morning.id),
                    entry(employee.id, 4, morning.id),
                ],
            },
        )
        .await?;
    let rows = service
        .batch_upsert(
            &current,
            BatchScheduleDto {
                entries: vec![entry(employee.id, 4, night.id)],
            },
        )
        .await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].shift_id, night.id);

    let stored = ScheduleRepository::new(db)
        .list(&ScheduleFilter {
            start_date: day(1),
            end_date: day(31),
            employee_ids: Some(vec![employee.id]),
        })
        .await?;
    assert_eq!(stored.len(), 2);
    assert!(stored
        .iter()
        .any(|r| r.schedule_date == day(4) && r.shift_id == night.id));

    let result = service
        .batch_upsert(&current, BatchScheduleDto { entries: vec![] })
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests copying a range creates missing rows and skips occupied target dates.
///
/// Expected: created 1, skipped 1, the occupied date keeps its shift
#[tokio::test]
async fn copy_counts_created_and_skipped() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let morning = factory::create_shift(db).await?;
    let night = factory::shift::WorkShiftFactory::new(db)
        .hours("22:00", "06:00")
        .build()
        .await?;
    let current = login_as(db, session, admin.id).await?;

    let service = ScheduleService::new(db);
    service
        .batch_upsert(
            &current,
            BatchScheduleDto {
                entries: vec![
                    entry(employee.id, 3, morning.id),
                    entry(employee.id, 4, morning.id),
                    entry(employee.id, 11, night.id),
                ],
            },
        )
        .await?;

    let result = service
        .copy(
            &current,
            CopySchedulesDto {
                source_start: day(3),
                source_end: day(4),
                target_start: day(10),
                employee_ids: None,
            },
        )
        .await?;
    assert_eq!(result.created, 1);
    assert_eq!(result.skipped, 1);

    let occupied = ScheduleRepository::new(db)
        .find_for_day(employee.id, day(11))
        .await?
        .unwrap();
    assert_eq!(occupied.shift_id, night.id);

    Ok(())
}

/// Tests a copy whose target range runs past the last representable date.
///
/// Expected: Err(AppError::BadRequest) and nothing written
#[tokio::test]
async fn copy_refuses_unrepresentable_target() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_schedule_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let shift = factory::create_shift(db).await?;
    let current = login_as(db, session, admin.id).await?;

    let service = ScheduleService::new(db);
    service
        .batch_upsert(
            &current,
            BatchScheduleDto {
                entries: vec![entry(employee.id, 3, shift.id), entry(employee.id, 9, shift.id)],
            },
        )
        .await?;

    let result = service
        .copy(
            &current,
            CopySchedulesDto {
                source_start: day(3),
                source_end: day(9),
                target_start: NaiveDate::MAX - chrono::Duration::days(2),
                employee_ids: None,
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let rows = ScheduleRepository::new(db)
        .list(&ScheduleFilter {
            start_date: day(1),
            end_date: day(31),
            employee_ids: Some(vec![employee.id]),
        })
        .await?;
    assert_eq!(rows.len(), 2);

    Ok(())
}

use super::*;
use crate::{
    model::{api::PaginationParams, clock::ClockRecordsQueryDto},
    server::{
        data::{
            attendance::{
                CreateLeaveParams, CreateOvertimeParams, Decision, LeaveRepository,
                OvertimeRepository,
            },
            schedule::ScheduleRepository,
        },
        model::{attendance::RequestStatus, clock::ClockRules, schedule::ScheduleEntry},
        service::clock::ClockService,
    },
};
use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

fn rules() -> ClockRules {
    ClockRules {
        offset: FixedOffset::east_opt(8 * 3600).unwrap(),
        late_minutes: 30,
        early_leave_minutes: 30,
    }
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

/// Office time (UTC+8) on 2025-06-`d` as a UTC instant.
fn local(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    rules()
        .offset
        .with_ymd_and_hms(2025, 6, d, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

async fn schedule_shift(
    db: &sea_orm::DatabaseConnection,
    employee_id: i32,
    date: NaiveDate,
    start: &str,
    end: &str,
) -> Result<(), AppError> {
    let shift = factory::shift::WorkShiftFactory::new(db)
        .hours(start, end)
        .build()
        .await?;
    ScheduleRepository::new(db)
        .upsert(ScheduleEntry {
            employee_id,
            schedule_date: date,
            shift_id: shift.id,
            is_rest_day: false,
            note: None,
        })
        .await?;
    Ok(())
}

/// Tests a day without a scheduled shift clocks in and out normally, once each.
///
/// Expected: normal record with 8 hours, repeated clocks rejected
#[tokio::test]
async fn clocks_in_and_out_once_per_day() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_clock_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let current = login_as(db, session, user.id).await?;
    let service = ClockService::new(db, rules());

    let (clocked_in, notification) = service.clock_in(&current, local(2, 9, 0)).await?;
    assert_eq!(clocked_in.record.employee_id, employee.id);
    assert_eq!(clocked_in.record.record_date, day(2));
    assert_eq!(clocked_in.record.status, "normal");
    assert!(notification.is_none());

    let again = service.clock_in(&current, local(2, 9, 5)).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let (clocked_out, _) = service.clock_out(&current, local(2, 17, 0)).await?;
    assert_eq!(clocked_out.record.work_hours, Some(8.0));
    assert_eq!(clocked_out.record.status, "normal");

    let again = service.clock_out(&current, local(2, 18, 0)).await;
    assert!(matches!(again, Err(AppError::BadRequest(_))));

    let today = service.today(&current, None, local(2, 20, 0)).await?;
    assert_eq!(today.map(|r| r.id), Some(clocked_in.record.id));

    Ok(())
}

/// Tests clocking out before clocking in.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn clock_out_requires_clock_in() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_clock_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let current = login_as(db, session, user.id).await?;

    let result = ClockService::new(db, rules())
        .clock_out(&current, local(2, 18, 0))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests lateness and early leave against a 09:00-18:00 shift with 30 minutes grace.
///
/// Expected: late record stays late after an early clock-out, two abnormal notifications
#[tokio::test]
async fn flags_late_and_early_against_shift() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_clock_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    schedule_shift(db, employee.id, day(2), "09:00", "18:00").await?;
    schedule_shift(db, employee.id, day(3), "09:00", "18:00").await?;
    let current = login_as(db, session, user.id).await?;
    let service = ClockService::new(db, rules());

    let (late, notification) = service.clock_in(&current, local(2, 9, 45)).await?;
    assert_eq!(late.record.status, "late");
    assert_eq!(late.late_minutes, Some(45));
    let notification = notification.unwrap();
    assert_eq!(notification.kind, "attendance_abnormal");
    assert_eq!(notification.user_id, user.id);

    let (late_and_early, notification) = service.clock_out(&current, local(2, 17, 0)).await?;
    assert_eq!(late_and_early.record.status, "late");
    assert_eq!(late_and_early.early_minutes, Some(60));
    assert!(notification.is_some());

    let (within_grace, notification) = service.clock_in(&current, local(3, 9, 30)).await?;
    assert_eq!(within_grace.record.status, "normal");
    assert_eq!(within_grace.late_minutes, None);
    assert!(notification.is_none());

    let (left_early, _) = service.clock_out(&current, local(3, 17, 0)).await?;
    assert_eq!(left_early.record.status, "early");

    Ok(())
}

/// Tests an overnight shift is closed by a clock-out on the next day.
///
/// Expected: the clock-out lands on the record dated the shift's start day
#[tokio::test]
async fn overnight_clock_out_closes_previous_day() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_clock_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    schedule_shift(db, employee.id, day(2), "22:00", "06:00").await?;
    let current = login_as(db, session, user.id).await?;
    let service = ClockService::new(db, rules());

    let (clocked_in, _) = service.clock_in(&current, local(2, 21, 55)).await?;
    let (clocked_out, notification) = service.clock_out(&current, local(3, 6, 1)).await?;

    assert_eq!(clocked_out.record.id, clocked_in.record.id);
    assert_eq!(clocked_out.record.record_date, day(2));
    assert_eq!(clocked_out.record.status, "normal");
    assert_eq!(clocked_out.record.work_hours, Some(8.1));
    assert!(notification.is_none());

    Ok(())
}

/// Tests statistics cover the whole range and add approved leave and overtime.
///
/// Expected: status filter narrows the page only, totals include overtime hours
#[tokio::test]
async fn records_summarize_range() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_clock_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    schedule_shift(db, employee.id, day(3), "09:00", "18:00").await?;
    let current = login_as(db, session, user.id).await?;
    let service = ClockService::new(db, rules());

    service.clock_in(&current, local(2, 9, 0)).await?;
    service.clock_out(&current, local(2, 17, 0)).await?;
    service.clock_in(&current, local(3, 10, 0)).await?;
    service.clock_out(&current, local(3, 18, 0)).await?;

    let overtime = OvertimeRepository::new(db);
    let record = overtime
        .create(CreateOvertimeParams {
            employee_id: employee.id,
            overtime_date: day(4),
            start_time: local(4, 18, 0),
            end_time: local(4, 20, 0),
            hours: 2.0,
            reason: "Release".to_string(),
        })
        .await?;
    overtime.decide(record.id, approved()).await?;

    let annual = factory::create_vacation_type(db).await?;
    let leave = LeaveRepository::new(db);
    let record = leave
        .create(CreateLeaveParams {
            employee_id: employee.id,
            vacation_type_id: annual.id,
            start_date: day(5),
            end_date: day(5),
            days: 1.0,
            reason: None,
        })
        .await?;
    leave.decide(record.id, approved()).await?;

    let query = ClockRecordsQueryDto {
        employee_id: None,
        start_date: Some(day(1)),
        end_date: Some(day(30)),
        status: Some("late".to_string()),
    };
    let result = service
        .records(&current, query, PaginationParams::default())
        .await?;

    assert_eq!(result.records.total, 1);
    assert_eq!(result.records.items[0].record_date, day(3));
    assert_eq!(result.stats.total_days, 4);
    assert_eq!(result.stats.normal_count, 1);
    assert_eq!(result.stats.late_count, 1);
    assert_eq!(result.stats.leave_count, 1);
    assert_eq!(result.stats.overtime_count, 1);
    assert_eq!(result.stats.total_work_hours, 18.0);
    assert_eq!(result.stats.avg_work_hours, 4.5);
    assert_eq!(result.stats.attendance_rate, 50.0);

    let reversed = ClockRecordsQueryDto {
        start_date: Some(day(9)),
        end_date: Some(day(1)),
        ..Default::default()
    };
    let result = service
        .records(&current, reversed, PaginationParams::default())
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests reading a colleague's records without the approval permission.
///
/// Expected: Err(AppError::AuthErr)
#[tokio::test]
async fn others_records_need_permission() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_clock_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let (user, _) = factory::helpers::create_employee_with_user(db, Some(department.id)).await?;
    let (_, colleague) =
        factory::helpers::create_employee_with_user(db, Some(department.id)).await?;
    let current = login_as(db, session, user.id).await?;

    let result = ClockService::new(db, rules())
        .today(&current, Some(colleague.id), local(2, 12, 0))
        .await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));

    Ok(())
}

fn approved() -> Decision {
    Decision {
        status: RequestStatus::Approved,
        approver_id: None,
        note: None,
    }
}

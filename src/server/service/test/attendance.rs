use super::*;
use crate::{
    model::attendance::{ApplyLeaveDto, ApplyOvertimeDto},
    server::{
        data::{
            notification::NotificationRepository,
            schedule::ScheduleRepository,
            vacation::BalanceRepository,
        },
        model::schedule::ScheduleFilter,
        service::attendance::AttendanceService,
    },
};
use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
}

fn leave(vacation_type_id: i32, start: u32, end: u32) -> ApplyLeaveDto {
    ApplyLeaveDto {
        employee_id: None,
        vacation_type_id,
        start_date: day(start),
        end_date: day(end),
        days: f64::from(end - start + 1),
        reason: Some("Trip".to_string()),
    }
}

/// Tests approving leave deducts the balance, marks rest days and notifies.
///
/// Expected: used_days 3, three rest-day rows and one notification for the requester
#[tokio::test]
async fn approval_applies_side_effects() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let approver = manager_of(db, department.id, &["attendance:approve"]).await?;
    let (requester, employee) =
        factory::helpers::create_employee_with_user(db, Some(department.id)).await?;
    let annual = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 5).await?;

    let service = AttendanceService::new(db);

    let current = login_as(db, session, requester.id).await?;
    let applied = service.apply_leave(&current, leave(annual.id, 2, 4)).await?;
    assert_eq!(applied.status, "pending");
    assert_eq!(applied.employee_id, employee.id);

    let current = login_as(db, session, approver.id).await?;
    let (approved, notification) = service
        .approve_leave(&current, applied.id, Some("ok".to_string()))
        .await?;

    assert_eq!(approved.status, "approved");
    assert_eq!(approved.approver_id, Some(approver.id));
    assert_eq!(notification.user_id, requester.id);

    let balance = BalanceRepository::new(db)
        .find(employee.id, 2025, annual.id)
        .await?
        .unwrap();
    assert_eq!(balance.used_days, 3.0);

    let rows = ScheduleRepository::new(db)
        .list(&ScheduleFilter {
            start_date: day(1),
            end_date: day(30),
            employee_ids: Some(vec![employee.id]),
        })
        .await?;
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.is_rest_day));

    assert_eq!(NotificationRepository::new(db).unread_count(requester.id).await?, 1);

    Ok(())
}

/// Tests approval fails without enough remaining days and changes nothing.
///
/// Expected: Err(AppError::BadRequest) with the record still pending
#[tokio::test]
async fn approval_requires_sufficient_balance() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (requester, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 1).await?;

    let service = AttendanceService::new(db);

    let current = login_as(db, session, requester.id).await?;
    let applied = service.apply_leave(&current, leave(annual.id, 2, 4)).await?;

    let current = login_as(db, session, admin.id).await?;
    let result = service.approve_leave(&current, applied.id, None).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let rows = ScheduleRepository::new(db)
        .list(&ScheduleFilter {
            start_date: day(1),
            end_date: day(30),
            employee_ids: Some(vec![employee.id]),
        })
        .await?;
    assert!(rows.is_empty());

    let current = login_as(db, session, requester.id).await?;
    let cancelled = service.cancel_leave(&current, applied.id).await?;
    assert_eq!(cancelled.status, "cancelled");

    Ok(())
}

/// Tests overlapping requests are refused.
///
/// Expected: Err(AppError::BadRequest) for the second request
#[tokio::test]
async fn rejects_overlapping_request() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (requester, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    let current = login_as(db, session, requester.id).await?;

    let service = AttendanceService::new(db);
    service.apply_leave(&current, leave(annual.id, 2, 4)).await?;
    let result = service.apply_leave(&current, leave(annual.id, 4, 5)).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests another user without approval rights cannot cancel a request.
///
/// Expected: Err(AppError::AuthErr)
#[tokio::test]
async fn stranger_cannot_cancel() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (requester, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let stranger = factory::create_user(db).await?;
    let annual = factory::create_vacation_type(db).await?;

    let service = AttendanceService::new(db);
    let current = login_as(db, session, requester.id).await?;
    let applied = service.apply_leave(&current, leave(annual.id, 2, 4)).await?;

    let current = login_as(db, session, stranger.id).await?;
    let result = service.cancel_leave(&current, applied.id).await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));

    Ok(())
}

/// Tests two concurrent approvals of one request deduct the balance once.
///
/// Expected: one Ok, one Err(AppError::BadRequest) and used_days 3
#[tokio::test]
async fn concurrent_approvals_deduct_once() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (requester, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 10).await?;

    let service = AttendanceService::new(db);
    let current = login_as(db, session, requester.id).await?;
    let applied = service.apply_leave(&current, leave(annual.id, 2, 4)).await?;

    let current = login_as(db, session, admin.id).await?;
    let (first, second) = tokio::join!(
        service.approve_leave(&current, applied.id, None),
        service.approve_leave(&current, applied.id, None)
    );

    let outcomes = [first, second];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .any(|r| matches!(r, Err(AppError::BadRequest(_)))));

    let balance = BalanceRepository::new(db)
        .find(employee.id, 2025, annual.id)
        .await?
        .unwrap();
    assert_eq!(balance.used_days, 3.0);

    Ok(())
}

/// Tests leave requests longer than the range cap or claiming more days than the span.
///
/// Expected: Err(AppError::BadRequest) for both and no stored record
#[tokio::test]
async fn rejects_oversized_leave() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (requester, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    let current = login_as(db, session, requester.id).await?;
    let service = AttendanceService::new(db);

    let mut whole_year = leave(annual.id, 1, 1);
    whole_year.start_date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    whole_year.end_date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
    whole_year.days = 1.0;
    let result = service.apply_leave(&current, whole_year).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut inflated = leave(annual.id, 2, 4);
    inflated.days = 10.0;
    let result = service.apply_leave(&current, inflated).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let mut half_day = leave(annual.id, 2, 2);
    half_day.days = 0.5;
    let applied = service.apply_leave(&current, half_day).await?;
    assert_eq!(applied.days, 0.5);

    Ok(())
}

/// Tests the overtime date must be the local date the overtime starts on.
///
/// Expected: Err(AppError::BadRequest) for a mismatched date, Ok in the office offset
#[tokio::test]
async fn overtime_date_follows_start_time() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (requester, _) = factory::helpers::create_employee_with_user(db, None).await?;
    let current = login_as(db, session, requester.id).await?;
    let service = AttendanceService::new(db);
    let offset = FixedOffset::east_opt(8 * 3600).unwrap();

    // 2025-06-02 22:00 local is 14:00 UTC.
    let start = Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 6, 2, 17, 0, 0).unwrap();
    let request = |overtime_date| ApplyOvertimeDto {
        employee_id: None,
        overtime_date,
        start_time: start,
        end_time: end,
        reason: "Release".to_string(),
    };

    let result = service.apply_overtime(&current, request(day(5)), offset).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let created = service.apply_overtime(&current, request(day(2)), offset).await?;
    assert_eq!(created.overtime_date, day(2));
    assert_eq!(created.hours, 3.0);

    let mut marathon = request(day(2));
    marathon.end_time = Utc.with_ymd_and_hms(2025, 6, 4, 14, 0, 0).unwrap();
    let result = service.apply_overtime(&current, marathon, offset).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

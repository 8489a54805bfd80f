use super::*;
use crate::{
    model::{
        api::PaginationParams,
        vacation::{
            AdjustBalanceDto, AdjustMode, BatchAdjustBalanceDto, ConvertOvertimeDto,
            CreateConversionRuleDto, UpdateConversionRuleDto,
        },
    },
    server::{
        data::{
            attendance::{CreateOvertimeParams, Decision, OvertimeRepository},
            vacation::{AuditLogRepository, BalanceRepository, OvertimeConversionRepository},
        },
        model::attendance::RequestStatus,
        service::{balance::BalanceService, vacation::VacationService},
    },
};
use chrono::{NaiveDate, TimeZone, Utc};

fn adjust(vacation_type_id: i32, mode: AdjustMode, days: f64) -> AdjustBalanceDto {
    AdjustBalanceDto {
        year: 2025,
        vacation_type_id,
        mode,
        days,
        reason: Some("correction".to_string()),
    }
}

/// Tests each adjustment mode against the remaining balance.
///
/// Verifies set targets the remaining days and decrease never drops below zero, with
/// one audit row per adjustment.
///
/// Expected: remaining 7, then 3, then 0
#[tokio::test]
async fn adjusts_remaining_balance() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 5).await?;
    let current = login_as(db, session, admin.id).await?;

    let service = BalanceService::new(db);

    let increased = service
        .adjust(&current, employee.id, adjust(annual.id, AdjustMode::Increase, 2.0))
        .await?;
    assert_eq!(increased.total_days, 5.0);
    assert_eq!(increased.adjusted_days, 2.0);
    assert_eq!(increased.remaining_days, 7.0);

    let set = service
        .adjust(&current, employee.id, adjust(annual.id, AdjustMode::Set, 3.0))
        .await?;
    assert_eq!(set.adjusted_days, -2.0);
    assert_eq!(set.remaining_days, 3.0);

    let decreased = service
        .adjust(&current, employee.id, adjust(annual.id, AdjustMode::Decrease, 10.0))
        .await?;
    assert_eq!(decreased.remaining_days, 0.0);

    let history = service
        .history(&current, employee.id, Some(2025), PaginationParams::default())
        .await?;
    assert_eq!(history.total, 3);
    assert!(history.items.iter().all(|entry| entry.operation == "adjust"));

    Ok(())
}

/// Tests negative adjustment days are rejected.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_negative_days() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    let current = login_as(db, session, admin.id).await?;

    let result = BalanceService::new(db)
        .adjust(&current, employee.id, adjust(annual.id, AdjustMode::Increase, -1.0))
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests a batch touching an employee outside the caller's scope writes nothing.
///
/// Expected: Err(AppError::AuthErr) and no balance for the visible employee
#[tokio::test]
async fn batch_adjust_is_all_or_nothing() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let own = factory::create_department(db).await?;
    let foreign = factory::create_department(db).await?;
    let manager = manager_of(db, own.id, &["vacation:manage"]).await?;
    let (_, visible) = factory::helpers::create_employee_with_user(db, Some(own.id)).await?;
    let (_, hidden) = factory::helpers::create_employee_with_user(db, Some(foreign.id)).await?;
    let annual = factory::create_vacation_type(db).await?;
    let current = login_as(db, session, manager.id).await?;

    let result = BalanceService::new(db)
        .batch_adjust(
            &current,
            BatchAdjustBalanceDto {
                employee_ids: vec![visible.id, hidden.id],
                year: 2025,
                vacation_type_id: annual.id,
                mode: AdjustMode::Increase,
                days: 1.0,
                reason: None,
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));
    assert!(BalanceRepository::new(db)
        .find(visible.id, 2025, annual.id)
        .await?
        .is_none());

    Ok(())
}

/// Tests the statutory total follows holiday changes on the next read.
///
/// Expected: total grows from 2 to 5 after another holiday is added
#[tokio::test]
async fn resyncs_statutory_total() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    factory::create_holiday(db, annual.id, 2025, 2).await?;
    let current = login_as(db, session, admin.id).await?;

    let service = BalanceService::new(db);
    let before = service.employee_balances(&current, employee.id, 2025).await?;
    assert_eq!(before.balances[0].total_days, 2.0);

    factory::vacation::create_holiday_in_month(db, annual.id, 2025, 10, 3).await?;
    let after = service.employee_balances(&current, employee.id, 2025).await?;
    assert_eq!(after.balances[0].total_days, 5.0);

    let history = service
        .history(&current, employee.id, Some(2025), PaginationParams::default())
        .await?;
    assert_eq!(history.total, 1);
    assert_eq!(history.items[0].operation, "statutory_sync");
    assert_eq!(history.items[0].change_days, 3.0);

    Ok(())
}

/// Records `hours` of approved overtime on 2025-04-01.
async fn approved_overtime(
    db: &sea_orm::DatabaseConnection,
    employee_id: i32,
    hours: f64,
) -> Result<(), AppError> {
    let start = Utc.with_ymd_and_hms(2025, 4, 1, 18, 0, 0).unwrap();
    let repo = OvertimeRepository::new(db);
    let record = repo
        .create(CreateOvertimeParams {
            employee_id,
            overtime_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            start_time: start,
            end_time: start + chrono::Duration::minutes((hours * 60.0) as i64),
            hours,
            reason: "Release".to_string(),
        })
        .await?;
    repo.decide(
        record.id,
        Decision {
            status: RequestStatus::Approved,
            approver_id: None,
            note: None,
        },
    )
    .await?;
    Ok(())
}

fn convert(
    employee_id: i32,
    hours: f64,
    target_type_id: i32,
    rule_id: Option<i32>,
) -> ConvertOvertimeDto {
    ConvertOvertimeDto {
        employee_id,
        overtime_hours: hours,
        target_type_id,
        conversion_rule_id: rule_id,
    }
}

/// Tests the conversion ratio falls back from the type's enabled rule to 1.0, and
/// that each conversion writes the balance, an audit row and a conversion row.
///
/// Expected: 1.5 days at ratio 1.5, then 0.5 days at ratio 1.0; a disabled rule and
/// hours beyond the available total are refused
#[tokio::test]
async fn converts_overtime_with_rule_fallback() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let (_, employee) = factory::helpers::create_employee_with_user(db, None).await?;
    let annual = factory::create_vacation_type(db).await?;
    approved_overtime(db, employee.id, 16.0).await?;
    let current = login_as(db, session, admin.id).await?;

    let rules = VacationService::new(db);
    let disabled = rules
        .create_rule(CreateConversionRuleDto {
            name: "Holiday".to_string(),
            source_type: None,
            target_type: annual.code.clone(),
            ratio: 3.0,
            enabled: Some(false),
            description: None,
        })
        .await?;
    let weekend = rules
        .create_rule(CreateConversionRuleDto {
            name: "Weekend".to_string(),
            source_type: None,
            target_type: annual.code.clone(),
            ratio: 1.5,
            enabled: Some(true),
            description: None,
        })
        .await?;

    let service = BalanceService::new(db);

    let result = service
        .convert_overtime(
            &current,
            convert(employee.id, 8.0, annual.id, Some(disabled.id)),
            2025,
        )
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let first = service
        .convert_overtime(&current, convert(employee.id, 8.0, annual.id, None), 2025)
        .await?;
    assert_eq!(first.conversion_ratio, 1.5);
    assert_eq!(first.converted_days, 1.5);
    assert_eq!(first.conversion_rule_id, Some(weekend.id));

    rules
        .update_rule(
            weekend.id,
            UpdateConversionRuleDto {
                enabled: Some(false),
                ..Default::default()
            },
        )
        .await?;
    let second = service
        .convert_overtime(&current, convert(employee.id, 4.0, annual.id, None), 2025)
        .await?;
    assert_eq!(second.conversion_ratio, 1.0);
    assert_eq!(second.converted_days, 0.5);
    assert_eq!(second.conversion_rule_id, None);

    let result = service
        .convert_overtime(&current, convert(employee.id, 8.0, annual.id, None), 2025)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let balance = BalanceRepository::new(db)
        .find(employee.id, 2025, annual.id)
        .await?
        .unwrap();
    assert_eq!(balance.converted_days, 2.0);

    let (audit, audit_total) = AuditLogRepository::new(db)
        .get_paginated(employee.id, Some(2025), 0, 50)
        .await?;
    assert_eq!(audit_total, 2);
    assert!(audit.iter().all(|entry| entry.operation == "convert"));

    let (_, conversions) = OvertimeConversionRepository::new(db)
        .get_paginated(Some(&[employee.id]), 0, 50)
        .await?;
    assert_eq!(conversions, 2);
    assert_eq!(
        OvertimeConversionRepository::new(db)
            .converted_hours(employee.id)
            .await?,
        12.0
    );

    Ok(())
}

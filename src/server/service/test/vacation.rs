use super::*;
use crate::{
    model::vacation::{CreateConversionRuleDto, UpdateConversionRuleDto},
    server::service::vacation::VacationService,
};

fn rule(name: &str, target_type: &str, ratio: f64, enabled: bool) -> CreateConversionRuleDto {
    CreateConversionRuleDto {
        name: name.to_string(),
        source_type: None,
        target_type: target_type.to_string(),
        ratio,
        enabled: Some(enabled),
        description: None,
    }
}

/// Tests enabling a rule, on create or update, disables every other rule.
///
/// Expected: a single enabled rule after each write
#[tokio::test]
async fn keeps_one_enabled_rule() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let annual = factory::create_vacation_type(db).await?;
    let service = VacationService::new(db);

    let first = service.create_rule(rule("Standard", &annual.code, 1.0, true)).await?;
    let second = service.create_rule(rule("Weekend", &annual.code, 1.5, true)).await?;

    let enabled = service.list_rules(Some(true)).await?;
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].id, second.id);

    service
        .update_rule(
            first.id,
            UpdateConversionRuleDto {
                enabled: Some(true),
                ..Default::default()
            },
        )
        .await?;
    let enabled = service.list_rules(Some(true)).await?;
    assert_eq!(enabled.len(), 1);
    assert_eq!(enabled[0].id, first.id);

    service.create_rule(rule("Draft", &annual.code, 2.0, false)).await?;
    let enabled = service.list_rules(Some(true)).await?;
    assert_eq!(enabled.len(), 1);
    assert_eq!(service.list_rules(None).await?.len(), 3);

    Ok(())
}

/// Tests rules must credit an existing vacation type with a positive ratio.
///
/// Expected: Err(AppError::BadRequest) for both
#[tokio::test]
async fn validates_rule_target_and_ratio() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_vacation_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let annual = factory::create_vacation_type(db).await?;
    let service = VacationService::new(db);

    let result = service.create_rule(rule("Ghost", "no_such_type", 1.0, true)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service.create_rule(rule("Zero", &annual.code, 0.0, true)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

use super::*;
use crate::{
    model::assessment::{CreateExamDto, CreatePlanDto},
    server::service::assessment::AssessmentService,
};
use chrono::{Duration, Utc};

/// Tests attempts are numbered and capped by the plan's maximum.
///
/// Expected: attempts 1 and 2 succeed, the third is refused
#[tokio::test]
async fn caps_attempts() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, department.id).await?;
    let exam = factory::create_exam(db).await?;
    let plan = factory::assessment::AssessmentPlanFactory::new(db, exam.id)
        .max_attempts(2)
        .departments(&[department.id])
        .build()
        .await?;
    let current = login_as(db, session, user.id).await?;

    let service = AssessmentService::new(db);
    let now = Utc::now();

    let first = service.start_attempt(&current, plan.id, now).await?;
    let second = service.start_attempt(&current, plan.id, now).await?;
    let third = service.start_attempt(&current, plan.id, now).await;

    assert_eq!(first.attempt_no, 1);
    assert_eq!(second.attempt_no, 2);
    assert_eq!(first.status, "in_progress");
    assert!(matches!(third, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests attempts are refused outside the plan window.
///
/// Expected: Err(AppError::BadRequest) before the start time
#[tokio::test]
async fn refuses_plan_not_started() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, department.id).await?;
    let exam = factory::create_exam(db).await?;
    let now = Utc::now();
    let plan = factory::assessment::AssessmentPlanFactory::new(db, exam.id)
        .window(now + Duration::days(1), now + Duration::days(2))
        .departments(&[department.id])
        .build()
        .await?;
    let current = login_as(db, session, user.id).await?;

    let result = AssessmentService::new(db)
        .start_attempt(&current, plan.id, now)
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests users outside the target departments cannot take the plan.
///
/// Expected: Err(AppError::AuthErr)
#[tokio::test]
async fn refuses_untargeted_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let targeted = factory::create_department(db).await?;
    let other = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, other.id).await?;
    let exam = factory::create_exam(db).await?;
    let plan = factory::create_plan(db, exam.id, &[targeted.id]).await?;
    let current = login_as(db, session, user.id).await?;

    let result = AssessmentService::new(db)
        .start_attempt(&current, plan.id, Utc::now())
        .await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));

    Ok(())
}

/// Tests grading needs a submitted attempt and compares against the pass score.
///
/// Expected: grading in progress fails, 72 of 100 passes at 60
#[tokio::test]
async fn grades_submitted_attempt() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, department.id).await?;
    let grader = factory::helpers::create_super_admin(db).await?;
    let exam = factory::create_exam(db).await?;
    let plan = factory::create_plan(db, exam.id, &[department.id]).await?;

    let service = AssessmentService::new(db);

    let current = login_as(db, session, user.id).await?;
    let attempt = service.start_attempt(&current, plan.id, Utc::now()).await?;

    let grader_user = login_as(db, session, grader.id).await?;
    let early = service.grade_attempt(&grader_user, attempt.id, 72.0).await;
    assert!(matches!(early, Err(AppError::BadRequest(_))));

    let submitted = service.submit_attempt(&current, attempt.id).await?;
    assert_eq!(submitted.status, "submitted");
    let resubmitted = service.submit_attempt(&current, attempt.id).await;
    assert!(matches!(resubmitted, Err(AppError::BadRequest(_))));

    let out_of_range = service.grade_attempt(&grader_user, attempt.id, 101.0).await;
    assert!(matches!(out_of_range, Err(AppError::BadRequest(_))));

    let graded = service.grade_attempt(&grader_user, attempt.id, 72.0).await?;
    assert_eq!(graded.status, "graded");
    assert_eq!(graded.score, Some(72.0));
    assert_eq!(graded.passed, Some(true));

    let participants = service.participants(plan.id, Some("completed")).await?;
    assert_eq!(participants.participants.len(), 1);
    assert_eq!(participants.participants[0].user_id, user.id);

    Ok(())
}

/// Tests two attempts started at once on a single-attempt plan.
///
/// Expected: exactly one attempt is created
#[tokio::test]
async fn concurrent_starts_respect_cap() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, department.id).await?;
    let exam = factory::create_exam(db).await?;
    let plan = factory::assessment::AssessmentPlanFactory::new(db, exam.id)
        .max_attempts(1)
        .departments(&[department.id])
        .build()
        .await?;
    let current = login_as(db, session, user.id).await?;

    let service = AssessmentService::new(db);
    let now = Utc::now();
    let (first, second) = tokio::join!(
        service.start_attempt(&current, plan.id, now),
        service.start_attempt(&current, plan.id, now)
    );

    assert_eq!([&first, &second].iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        matches!(first, Err(AppError::BadRequest(_)))
            || matches!(second, Err(AppError::BadRequest(_)))
    );

    Ok(())
}

fn exam_dto(total_score: f64, pass_score: f64) -> CreateExamDto {
    CreateExamDto {
        title: "Safety".to_string(),
        description: None,
        duration_minutes: 30,
        total_score,
        pass_score,
    }
}

/// Tests exam creation validates scores and starts as a draft.
///
/// Expected: pass_score above total_score is refused, valid input creates a draft
#[tokio::test]
async fn validates_exam_scores() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let current = login_as(db, session, admin.id).await?;
    let service = AssessmentService::new(db);

    let result = service.create_exam(&current, exam_dto(50.0, 60.0)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service.create_exam(&current, exam_dto(0.0, 0.0)).await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let exam = service.create_exam(&current, exam_dto(100.0, 60.0)).await?;
    assert_eq!(exam.status, "draft");
    assert_eq!(exam.created_by, Some(admin.id));

    Ok(())
}

/// Tests plan creation checks the exam, the window and the departments.
///
/// Expected: unpublished exam, inverted window and unknown department are refused;
/// duplicate department ids collapse to one
#[tokio::test]
async fn validates_plan_creation() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_assessment_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let department = factory::create_department(db).await?;
    let published = factory::create_exam(db).await?;
    let draft = factory::assessment::ExamFactory::new(db)
        .status("draft")
        .build()
        .await?;
    let current = login_as(db, session, admin.id).await?;
    let service = AssessmentService::new(db);
    let now = Utc::now();

    let plan = |exam_id: i32, start_offset: i64, department_ids: Vec<i32>| CreatePlanDto {
        title: "Quarterly".to_string(),
        description: None,
        exam_id,
        start_time: now + Duration::hours(start_offset),
        end_time: now + Duration::hours(2),
        max_attempts: Some(2),
        department_ids,
    };

    let result = service
        .create_plan(&current, plan(draft.id, 1, vec![department.id]), now)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service
        .create_plan(&current, plan(published.id, 2, vec![department.id]), now)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service
        .create_plan(&current, plan(published.id, 1, vec![department.id, 9999]), now)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service
        .create_plan(&current, plan(published.id, 1, vec![]), now)
        .await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let (created, _) = service
        .create_plan(
            &current,
            plan(published.id, 1, vec![department.id, department.id]),
            now,
        )
        .await?;
    assert_eq!(created.department_ids, vec![department.id]);
    assert_eq!(created.status, "not_started");

    Ok(())
}

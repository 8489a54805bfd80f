use super::*;
use crate::{
    model::{
        api::PaginationParams,
        broadcast::{CreateBroadcastDto, ReceivedBroadcastFilterDto},
    },
    server::service::broadcast::BroadcastService,
};
use chrono::{Duration, Utc};

fn broadcast(target_type: &str, target_ids: Vec<i32>) -> CreateBroadcastDto {
    CreateBroadcastDto {
        title: "Maintenance".to_string(),
        content: "Systems offline at noon".to_string(),
        priority: None,
        target_type: target_type.to_string(),
        target_ids,
        expires_at: None,
    }
}

/// Tests a department broadcast reaches only that department's active users.
///
/// Expected: recipients are the two active members, the sender sees read stats
#[tokio::test]
async fn department_target_resolves_active_users() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let other = factory::create_department(db).await?;
    let sender = manager_of(db, department.id, &["broadcast:send"]).await?;
    let member = factory::user::create_user_in_department(db, department.id).await?;
    factory::user::UserFactory::new(db)
        .department_id(Some(department.id))
        .status("inactive")
        .build()
        .await?;
    factory::user::create_user_in_department(db, other.id).await?;
    let current = login_as(db, session, sender.id).await?;

    let sent = BroadcastService::new(db)
        .create(&current, broadcast("department", vec![department.id]))
        .await?;

    let mut recipients = sent.recipient_ids.clone();
    recipients.sort();
    assert_eq!(recipients, vec![sender.id, member.id]);
    assert_eq!(sent.broadcast.recipient_count, 2);
    assert_eq!(sent.broadcast.read_count, 0);
    assert_eq!(sent.broadcast.priority, "normal");

    Ok(())
}

/// Tests targeting a department outside the sender's scope.
///
/// Expected: Err(AppError::AuthErr)
#[tokio::test]
async fn refuses_department_outside_scope() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let own = factory::create_department(db).await?;
    let foreign = factory::create_department(db).await?;
    let sender = manager_of(db, own.id, &["broadcast:send"]).await?;
    factory::user::create_user_in_department(db, foreign.id).await?;
    let current = login_as(db, session, sender.id).await?;

    let result = BroadcastService::new(db)
        .create(&current, broadcast("department", vec![foreign.id]))
        .await;

    assert!(matches!(result, Err(AppError::AuthErr(_))));

    Ok(())
}

/// Tests input validation before any recipient is resolved.
///
/// Expected: unknown target type, past expiry and empty targets are all 400
#[tokio::test]
async fn validates_input() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let current = login_as(db, session, admin.id).await?;
    let service = BroadcastService::new(db);

    let unknown = service.create(&current, broadcast("everyone", vec![])).await;
    assert!(matches!(unknown, Err(AppError::BadRequest(_))));

    let mut expired = broadcast("all", vec![]);
    expired.expires_at = Some(Utc::now() - Duration::minutes(1));
    let expired = service.create(&current, expired).await;
    assert!(matches!(expired, Err(AppError::BadRequest(_))));

    let empty = service.create(&current, broadcast("individual", vec![])).await;
    assert!(matches!(empty, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests recipients see the broadcast and can mark it read once.
///
/// Expected: unread listing shrinks after reading, non-recipients get 404
#[tokio::test]
async fn recipients_mark_read() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    let reader = factory::create_user(db).await?;
    let outsider = factory::create_user(db).await?;

    let service = BroadcastService::new(db);
    let current = login_as(db, session, admin.id).await?;
    let sent = service
        .create(&current, broadcast("individual", vec![reader.id]))
        .await?;

    let current = login_as(db, session, reader.id).await?;
    let unread = ReceivedBroadcastFilterDto {
        is_read: Some(false),
    };
    let inbox = service
        .received(&current, unread.clone(), PaginationParams::default(), Utc::now())
        .await?;
    assert_eq!(inbox.total, 1);
    assert_eq!(inbox.items[0].id, sent.broadcast.id);

    service.mark_read(&current, sent.broadcast.id).await?;
    service.mark_read(&current, sent.broadcast.id).await?;
    let inbox = service
        .received(&current, unread, PaginationParams::default(), Utc::now())
        .await?;
    assert_eq!(inbox.total, 0);

    let current = login_as(db, session, outsider.id).await?;
    let result = service.mark_read(&current, sent.broadcast.id).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

use super::*;
use crate::{
    model::chat::{ChatHistoryQueryDto, CreateChatGroupDto},
    server::service::chat::ChatService,
};

fn group(name: &str, member_ids: Vec<i32>) -> CreateChatGroupDto {
    CreateChatGroupDto {
        name: name.to_string(),
        department_id: None,
        member_ids,
    }
}

/// Tests a sent message is pushed to the other members and counted unread for them.
///
/// Expected: recipients exclude the sender, unread moves 1 then 0 after reading
#[tokio::test]
async fn send_targets_other_members() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let creator = factory::create_user(db).await?;
    let member = factory::create_user(db).await?;
    let service = ChatService::new(db);

    let current = login_as(db, session, creator.id).await?;
    let created = service
        .create_group(&current, group("Ops", vec![member.id, creator.id]))
        .await?;
    assert_eq!(created.member_count, 2);

    let (message, recipients) = service.send(&current, created.id, "  hello  ").await?;
    assert_eq!(message.content, "hello");
    assert_eq!(recipients, vec![member.id]);
    assert_eq!(service.unread_count(&current).await?, 0);

    let current = login_as(db, session, member.id).await?;
    assert_eq!(service.unread_count(&current).await?, 1);
    service.mark_read(&current, created.id).await?;
    assert_eq!(service.unread_count(&current).await?, 0);

    let history = service
        .messages(
            &current,
            created.id,
            ChatHistoryQueryDto {
                before_id: None,
                limit: None,
            },
        )
        .await?;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender_id, creator.id);

    Ok(())
}

/// Tests muted groups are left out of the unread total.
///
/// Expected: zero unread while muted
#[tokio::test]
async fn muted_groups_do_not_count() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let creator = factory::create_user(db).await?;
    let member = factory::create_user(db).await?;
    let service = ChatService::new(db);

    let current = login_as(db, session, creator.id).await?;
    let created = service
        .create_group(&current, group("Ops", vec![member.id]))
        .await?;
    service.send(&current, created.id, "ping").await?;

    let current = login_as(db, session, member.id).await?;
    service.set_muted(&current, created.id, true).await?;
    assert_eq!(service.unread_count(&current).await?, 0);

    service.set_muted(&current, created.id, false).await?;
    assert_eq!(service.unread_count(&current).await?, 1);

    Ok(())
}

/// Tests only group admins manage membership while members may leave.
///
/// Expected: a member cannot add or remove others but can remove themselves
#[tokio::test]
async fn membership_rules() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let creator = factory::create_user(db).await?;
    let member = factory::create_user(db).await?;
    let newcomer = factory::create_user(db).await?;
    let service = ChatService::new(db);

    let current = login_as(db, session, creator.id).await?;
    let created = service
        .create_group(&current, group("Ops", vec![member.id]))
        .await?;

    let current = login_as(db, session, member.id).await?;
    let added = service.add_members(&current, created.id, &[newcomer.id]).await;
    assert!(matches!(added, Err(AppError::AuthErr(_))));
    let removed = service
        .remove_member(&current, created.id, creator.id)
        .await;
    assert!(matches!(removed, Err(AppError::AuthErr(_))));
    service.remove_member(&current, created.id, member.id).await?;

    let sent = service.send(&current, created.id, "still here?").await;
    assert!(sent.is_err());

    let current = login_as(db, session, creator.id).await?;
    let members = service
        .add_members(&current, created.id, &[newcomer.id, creator.id])
        .await?;
    assert_eq!(members.len(), 2);

    Ok(())
}

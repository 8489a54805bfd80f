use super::*;

/// Tests cleanup removes only old read notifications.
///
/// Verifies unread notifications survive regardless of age.
///
/// Expected: one row deleted, the old unread and recent read rows kept
#[tokio::test]
async fn deletes_old_read_notifications() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let old_read = notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    let old_unread = notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    let recent_read = notify(db, user.id, kind::LEAVE_APPROVAL).await?;

    let past = Utc::now() - Duration::days(40);
    for (row, is_read, created_at) in [
        (old_read, true, past),
        (old_unread, false, past),
        (recent_read.clone(), true, recent_read.created_at),
    ] {
        let mut active_model: entity::notification::ActiveModel = row.into();
        active_model.is_read = ActiveValue::Set(is_read);
        active_model.created_at = ActiveValue::Set(created_at);
        active_model.update(db).await?;
    }

    let repo = NotificationRepository::new(db);
    let removed = repo
        .delete_read_before(Utc::now() - Duration::days(30))
        .await?;

    assert_eq!(removed, 1);
    let (rows, _) = repo
        .get_paginated(user.id, &NotificationFilter::default(), 0, 10)
        .await?;
    assert_eq!(rows.len(), 2);

    Ok(())
}

use super::*;

/// Tests a user cannot mark someone else's notification read.
///
/// Expected: zero rows affected and the owner's unread count unchanged
#[tokio::test]
async fn only_owner_marks_read() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_user(db).await?;
    let stranger = factory::create_user(db).await?;
    let notification = notify(db, owner.id, kind::OVERTIME_APPROVAL).await?;

    let repo = NotificationRepository::new(db);

    assert_eq!(repo.mark_read(stranger.id, notification.id).await?, 0);
    assert_eq!(repo.unread_count(owner.id).await?, 1);
    assert_eq!(repo.delete(stranger.id, notification.id).await?, 0);

    assert_eq!(repo.mark_read(owner.id, notification.id).await?, 1);
    assert_eq!(repo.unread_count(owner.id).await?, 0);

    Ok(())
}

/// Tests marking everything read reports only previously unread rows.
///
/// Expected: second call affects nothing
#[tokio::test]
async fn mark_all_read_counts_unread_only() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    notify(db, user.id, kind::EXAM_NOTIFICATION).await?;

    let repo = NotificationRepository::new(db);

    assert_eq!(repo.mark_all_read(user.id).await?, 2);
    assert_eq!(repo.mark_all_read(user.id).await?, 0);

    Ok(())
}

use super::*;

/// Tests filtering by kind and unread state.
///
/// Verifies other users' notifications never leak into the listing.
///
/// Expected: only the user's unread leave approvals
#[tokio::test]
async fn filters_by_kind_and_unread() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let read = notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    let unread = notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    notify(db, user.id, kind::EXAM_NOTIFICATION).await?;
    notify(db, other.id, kind::LEAVE_APPROVAL).await?;

    let repo = NotificationRepository::new(db);
    repo.mark_read(user.id, read.id).await?;

    let filter = NotificationFilter {
        unread_only: true,
        kind: Some(kind::LEAVE_APPROVAL.to_string()),
    };
    let (rows, total) = repo.get_paginated(user.id, &filter, 0, 10).await?;

    assert_eq!(total, 1);
    assert_eq!(rows[0].id, unread.id);

    let (all, total) = repo
        .get_paginated(user.id, &NotificationFilter::default(), 0, 2)
        .await?;
    assert_eq!(total, 3);
    assert_eq!(all.len(), 2);

    Ok(())
}

/// Tests per-kind statistics.
///
/// Expected: total and unread per kind, ordered by kind
#[tokio::test]
async fn counts_by_kind() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let first = notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    notify(db, user.id, kind::LEAVE_APPROVAL).await?;
    notify(db, user.id, kind::EXAM_NOTIFICATION).await?;

    let repo = NotificationRepository::new(db);
    repo.mark_read(user.id, first.id).await?;

    let counts = repo.counts_by_kind(user.id).await?;

    assert_eq!(
        counts,
        vec![
            (kind::EXAM_NOTIFICATION.to_string(), 1, 1),
            (kind::LEAVE_APPROVAL.to_string(), 2, 1),
        ]
    );

    Ok(())
}

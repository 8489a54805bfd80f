use super::*;

/// Tests a memo gets one unread recipient row per user.
///
/// Expected: recipients ordered by user id, all unread
#[tokio::test]
async fn creates_recipient_rows() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let first = factory::create_user(db).await?;
    let second = factory::create_user(db).await?;

    let repo = MemoRepository::new(db);
    let memo = repo
        .create(department_memo(author.id), &[second.id, first.id])
        .await?;

    let recipients = repo.recipients(memo.id).await?;
    let user_ids: Vec<i32> = recipients.iter().map(|r| r.user_id).collect();
    assert_eq!(user_ids, vec![first.id, second.id]);
    assert!(recipients.iter().all(|r| !r.is_read));

    let (sent, total) = repo.get_sent_paginated(author.id, 0, 10).await?;
    assert_eq!(total, 1);
    assert_eq!(sent[0].id, memo.id);

    Ok(())
}

/// Tests soft-deleted memos disappear from lookups and listings.
///
/// Expected: find_by_id returns None and the inbox is empty
#[tokio::test]
async fn soft_delete_hides_memo() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let reader = factory::create_user(db).await?;

    let repo = MemoRepository::new(db);
    let memo = repo.create(department_memo(author.id), &[reader.id]).await?;
    repo.soft_delete(memo.clone()).await?;

    assert!(repo.find_by_id(memo.id).await?.is_none());
    let (rows, total) = repo.get_received_paginated(reader.id, None, 0, 10).await?;
    assert!(rows.is_empty());
    assert_eq!(total, 0);
    assert_eq!(repo.unread_count(reader.id).await?, 0);

    Ok(())
}

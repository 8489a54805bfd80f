use super::*;

/// Tests marking read updates the unread count and read statistics.
///
/// Expected: one of two recipients has read the memo
#[tokio::test]
async fn tracks_read_recipients() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let reader = factory::create_user(db).await?;
    let idle = factory::create_user(db).await?;

    let repo = MemoRepository::new(db);
    let memo = repo
        .create(department_memo(author.id), &[reader.id, idle.id])
        .await?;

    assert_eq!(repo.unread_count(reader.id).await?, 1);
    assert_eq!(repo.mark_read(memo.id, reader.id).await?, 1);
    assert_eq!(repo.unread_count(reader.id).await?, 0);

    let recipient = repo.recipient(memo.id, reader.id).await?.unwrap();
    assert!(recipient.is_read);
    assert!(recipient.read_at.is_some());

    let stats = repo.read_stats(&[memo.id]).await?;
    assert_eq!(stats.get(&memo.id), Some(&(2, 1)));

    Ok(())
}

/// Tests the inbox can be narrowed to one memo type.
///
/// Expected: only personal memos when filtering by personal
#[tokio::test]
async fn filters_inbox_by_type() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let reader = factory::create_user(db).await?;

    let repo = MemoRepository::new(db);
    repo.create(department_memo(author.id), &[reader.id]).await?;
    let personal = repo
        .create(
            CreateMemoParams {
                title: "Note".to_string(),
                content: "Call back".to_string(),
                memo_type: memo_type::PERSONAL,
                priority: "normal".to_string(),
                created_by: reader.id,
            },
            &[reader.id],
        )
        .await?;

    let (rows, total) = repo
        .get_received_paginated(reader.id, Some(memo_type::PERSONAL), 0, 10)
        .await?;

    assert_eq!(total, 1);
    assert_eq!(rows[0].1.id, personal.id);

    Ok(())
}

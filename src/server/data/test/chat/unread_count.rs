use super::*;

/// Tests unread counts skip the member's own messages and advance with the read marker.
///
/// Expected: two unread before reading, zero after
#[tokio::test]
async fn counts_messages_after_read_marker() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let member = factory::create_user(db).await?;

    let repo = ChatRepository::new(db);
    let group = repo
        .create_group("Ops".to_string(), None, creator.id, &[member.id])
        .await?;
    repo.create_message(group.id, creator.id, "hello".to_string())
        .await?;
    let last = repo
        .create_message(group.id, creator.id, "anyone?".to_string())
        .await?;
    repo.create_message(group.id, member.id, "here".to_string())
        .await?;

    let membership = repo.membership(group.id, member.id).await?.unwrap();
    assert_eq!(repo.unread_count(&membership).await?, 2);

    let membership = repo.set_last_read(membership, last.id).await?;
    assert_eq!(repo.unread_count(&membership).await?, 0);

    Ok(())
}

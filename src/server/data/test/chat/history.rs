use super::*;

/// Tests paging backwards from a message id.
///
/// Expected: the messages just before the cursor, oldest first
#[tokio::test]
async fn pages_before_cursor() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_messaging_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;

    let repo = ChatRepository::new(db);
    let group = repo
        .create_group("Ops".to_string(), None, creator.id, &[])
        .await?;
    let mut ids = Vec::new();
    for n in 0..5 {
        let message = repo
            .create_message(group.id, creator.id, format!("message {}", n))
            .await?;
        ids.push(message.id);
    }

    let page: Vec<i32> = repo
        .history(group.id, Some(ids[4]), 2)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(page, vec![ids[2], ids[3]]);

    let latest = repo.history(group.id, None, 10).await?;
    assert_eq!(latest.len(), 5);
    assert_eq!(latest[0].id, ids[0]);
    assert_eq!(repo.last_message(group.id).await?.map(|m| m.id), Some(ids[4]));

    Ok(())
}

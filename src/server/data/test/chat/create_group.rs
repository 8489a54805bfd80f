use super::*;

/// Tests the creator becomes admin and listed members join as members.
///
/// Verifies the creator is not added twice when also listed as a member.
///
/// Expected: two memberships with the expected roles
#[tokio::test]
async fn creator_is_admin() -> Result<(), DbErr> {
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
        .create_group("Ops".to_string(), None, creator.id, &[creator.id, member.id])
        .await?;

    assert_eq!(repo.member_count(group.id).await?, 2);
    let admin = repo.membership(group.id, creator.id).await?.unwrap();
    let regular = repo.membership(group.id, member.id).await?.unwrap();
    assert_eq!(admin.role, member_role::ADMIN);
    assert_eq!(regular.role, member_role::MEMBER);

    let groups = repo.groups_for_user(member.id).await?;
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0.id, group.id);

    Ok(())
}

/// Tests removing a member drops only that membership.
///
/// Expected: one row removed, the user no longer sees the group
#[tokio::test]
async fn removes_member() -> Result<(), DbErr> {
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

    assert_eq!(repo.remove_member(group.id, member.id).await?, 1);
    assert!(repo.groups_for_user(member.id).await?.is_empty());
    assert_eq!(repo.member_count(group.id).await?, 1);

    Ok(())
}

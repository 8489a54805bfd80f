use super::*;

/// Tests assigning roles replaces the previous set.
///
/// Expected: only the new roles remain, holders are reported once
#[tokio::test]
async fn replaces_existing_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let old = factory::create_role(db).await?;
    let first = factory::create_role(db).await?;
    let second = factory::create_role(db).await?;
    factory::assign_role(db, user.id, old.id).await?;

    let repo = RoleRepository::new(db);
    repo.set_user_roles(user.id, &[first.id, second.id]).await?;

    let mut role_ids = repo.role_ids_for_user(user.id).await?;
    role_ids.sort();
    assert_eq!(role_ids, vec![first.id, second.id]);
    assert_eq!(
        repo.user_ids_with_roles(&[first.id, second.id]).await?,
        vec![user.id]
    );
    assert!(repo.user_ids_with_roles(&[old.id]).await?.is_empty());

    Ok(())
}

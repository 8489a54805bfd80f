use super::*;

/// Tests an unassigned super-admin role does not count.
///
/// Expected: false until a user holds the role
#[tokio::test]
async fn requires_a_holder() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let role = factory::role::RoleFactory::new(db)
        .super_admin(true)
        .build()
        .await?;

    let repo = RoleRepository::new(db);
    assert!(!repo.super_admin_exists().await?);

    let user = factory::create_user(db).await?;
    factory::assign_role(db, user.id, role.id).await?;

    assert!(repo.super_admin_exists().await?);

    Ok(())
}

/// Tests an empty database reports no super admin.
///
/// Expected: false
#[tokio::test]
async fn false_on_empty_database() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    assert!(!RoleRepository::new(db).super_admin_exists().await?);

    Ok(())
}

use super::*;

/// Tests access is merged across every role of the user.
///
/// Verifies permission codes and department links are deduplicated and sorted.
///
/// Expected: union of both roles without duplicates
#[tokio::test]
async fn merges_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let first = factory::create_department(db).await?;
    let second = factory::create_department(db).await?;

    let viewer = factory::role::RoleFactory::new(db)
        .permissions(&["employee:view", "schedule:view"])
        .departments(&[first.id])
        .build()
        .await?;
    let manager = factory::role::RoleFactory::new(db)
        .permissions(&["employee:view", "employee:manage"])
        .departments(&[first.id, second.id])
        .build()
        .await?;
    factory::assign_role(db, user.id, viewer.id).await?;
    factory::assign_role(db, user.id, manager.id).await?;

    let access = RoleRepository::new(db).access_for_user(user.id).await?;

    assert!(!access.is_super_admin);
    assert_eq!(
        access.permission_codes,
        vec!["employee:manage", "employee:view", "schedule:view"]
    );
    assert_eq!(access.department_ids, vec![first.id, second.id]);

    Ok(())
}

/// Tests a user without roles has empty access.
///
/// Expected: default access
#[tokio::test]
async fn empty_without_roles() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;

    let access = RoleRepository::new(db).access_for_user(user.id).await?;

    assert!(!access.is_super_admin);
    assert!(access.permission_codes.is_empty());
    assert!(access.department_ids.is_empty());

    Ok(())
}

/// Tests the super-admin flag is set when any role carries it.
///
/// Expected: is_super_admin true
#[tokio::test]
async fn flags_super_admin() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::helpers::create_super_admin(db).await?;
    let plain = factory::create_role(db).await?;
    factory::assign_role(db, user.id, plain.id).await?;

    let access = RoleRepository::new(db).access_for_user(user.id).await?;

    assert!(access.is_super_admin);

    Ok(())
}

use super::*;

/// Tests role departments form the scope when present.
///
/// Verifies the user's own department is not added when roles grant departments.
///
/// Expected: scope is exactly the union of role departments
#[tokio::test]
async fn scope_is_union_of_role_departments() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let own = factory::create_department(db).await?;
    let first = factory::create_department(db).await?;
    let second = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, own.id).await?;

    let role_a = factory::role::RoleFactory::new(db)
        .departments(&[first.id])
        .build()
        .await?;
    let role_b = factory::role::RoleFactory::new(db)
        .departments(&[first.id, second.id])
        .build()
        .await?;
    factory::assign_role(db, user.id, role_a.id).await?;
    factory::assign_role(db, user.id, role_b.id).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let current = AuthGuard::new(db, session).require(&[]).await?;

    assert_eq!(
        current.scope,
        DepartmentScope::Departments(BTreeSet::from([first.id, second.id]))
    );
    assert!(!current.scope.contains(Some(own.id)));

    Ok(())
}

/// Tests the user's own department is the fallback scope.
///
/// Expected: scope contains only the user's department
#[tokio::test]
async fn scope_falls_back_to_own_department() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let own = factory::create_department(db).await?;
    let other = factory::create_department(db).await?;
    let user = factory::user::create_user_in_department(db, own.id).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let current = AuthGuard::new(db, session).require(&[]).await?;

    assert!(current.scope.contains(Some(own.id)));
    assert!(!current.scope.contains(Some(other.id)));
    assert_eq!(current.scope.narrow(Some(other.id)), Some(Vec::new()));
    assert_eq!(current.scope.narrow(None), Some(vec![own.id]));

    Ok(())
}

/// Tests a user without department or role departments sees no department.
///
/// Rows owned by the user stay visible through `can_see`.
///
/// Expected: empty scope, own rows visible
#[tokio::test]
async fn user_without_department_sees_only_own_rows() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let department = factory::create_department(db).await?;
    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let current = AuthGuard::new(db, session).require(&[]).await?;

    assert_eq!(current.scope.department_ids(), Some(Vec::new()));
    assert!(!current.can_see(Some(department.id), user.id + 1));
    assert!(current.can_see(Some(department.id), user.id));
    assert!(current.require_visible(None, user.id + 1).is_err());

    Ok(())
}

use super::*;

/// Tests a request without a session user is rejected.
///
/// Expected: Err(AuthError::NotAuthenticated)
#[tokio::test]
async fn rejects_missing_session_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::NotAuthenticated))
    ));

    Ok(())
}

/// Tests a session pointing at a deleted user is rejected.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn rejects_session_of_missing_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    AuthSession::new(session).set_user_id(4242).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    match result {
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(id))) => assert_eq!(id, 4242),
        other => panic!("Expected UserNotInDatabase, got: {:?}", other.map(|u| u.id())),
    }

    Ok(())
}

/// Tests an account deactivated after login loses access.
///
/// Expected: Err(AuthError::AccountDisabled)
#[tokio::test]
async fn rejects_inactive_account() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .status("inactive")
        .build()
        .await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccountDisabled(id))) if id == user.id
    ));

    Ok(())
}

/// Tests permissions granted through a role are honoured.
///
/// Expected: Ok(CurrentUser) holding the role's permission codes
#[tokio::test]
async fn grants_permission_from_role() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let role = factory::role::RoleFactory::new(db)
        .permissions(&["employee:view", "vacation:manage"])
        .build()
        .await?;
    factory::assign_role(db, user.id, role.id).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let current = AuthGuard::new(db, session)
        .require(&[Permission::EmployeeView, Permission::VacationManage])
        .await?;

    assert_eq!(current.id(), user.id);
    assert!(!current.is_super_admin);
    assert!(current.has(Permission::VacationManage));
    assert!(!current.has(Permission::RoleManage));

    Ok(())
}

/// Tests every listed permission must be held.
///
/// Expected: Err(AuthError::AccessDenied) naming the missing permission
#[tokio::test]
async fn denies_when_any_permission_missing() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let role = factory::role::RoleFactory::new(db)
        .permissions(&["employee:view"])
        .build()
        .await?;
    factory::assign_role(db, user.id, role.id).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::EmployeeView, Permission::EmployeeManage])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(user_id, message))) => {
            assert_eq!(user_id, user.id);
            assert!(message.contains("employee:manage"));
        }
        other => panic!("Expected AccessDenied, got: {:?}", other.map(|u| u.id())),
    }

    Ok(())
}

/// Tests a super administrator passes every check without explicit grants.
///
/// Expected: Ok(CurrentUser) with an unrestricted scope
#[tokio::test]
async fn super_admin_bypasses_permission_checks() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::helpers::create_super_admin(db).await?;
    AuthSession::new(session).set_user_id(admin.id).await?;

    let current = AuthGuard::new(db, session)
        .require(&Permission::ALL)
        .await?;

    assert!(current.is_super_admin);
    assert_eq!(current.scope, DepartmentScope::All);

    Ok(())
}

use super::*;
use crate::{
    model::auth::BootstrapDto,
    server::{
        error::auth::AuthError,
        service::{auth::AuthService, bootstrap::BootstrapCodeService},
        util::password::hash_password,
    },
};

/// Tests a correct password on a disabled account is still refused.
///
/// Expected: AccountDisabled for the inactive user, InvalidCredentials for a wrong password
#[tokio::test]
async fn login_refuses_inactive_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let hash = hash_password("secret1")?;
    let inactive = factory::user::UserFactory::new(db)
        .password_hash(hash.clone())
        .status("inactive")
        .build()
        .await?;
    let active = factory::user::UserFactory::new(db)
        .password_hash(hash)
        .build()
        .await?;

    let service = AuthService::new(db);

    let result = service.login(&inactive.username, "secret1").await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccountDisabled(id))) if id == inactive.id
    ));

    let result = service.login(&active.username, "wrong-one").await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    let logged_in = service.login(&active.username, "secret1").await?;
    assert!(logged_in.last_login_at.is_some());

    Ok(())
}

/// Tests password changes need the current password and a long enough new one.
///
/// Expected: short password is BadRequest, wrong old password is InvalidCredentials,
/// a valid change lets the new password log in
#[tokio::test]
async fn change_password_checks_old_and_length() -> Result<(), AppError> {
    let test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::user::UserFactory::new(db)
        .password_hash(hash_password("secret1")?)
        .build()
        .await?;
    let service = AuthService::new(db);

    let result = service.change_password(&user, "secret1", "abc").await;
    assert!(matches!(result, Err(AppError::BadRequest(_))));

    let result = service.change_password(&user, "not-it", "secret2").await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    service.change_password(&user, "secret1", "secret2").await?;
    service.login(&user.username, "secret2").await?;
    let result = service.login(&user.username, "secret1").await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    Ok(())
}

fn bootstrap_dto(code: &str, username: &str) -> BootstrapDto {
    BootstrapDto {
        code: code.to_string(),
        username: username.to_string(),
        password: "secret1".to_string(),
        real_name: "Root".to_string(),
    }
}

/// Tests the bootstrap code works once and only while no super administrator exists.
///
/// Expected: wrong code refused, first use creates a super admin, reuse is refused
#[tokio::test]
async fn bootstrap_is_single_use() -> Result<(), AppError> {
    let mut test = TestBuilder::new().with_org_tables().build().await.unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let codes = BootstrapCodeService::new();
    let code = codes.generate().await;
    let service = AuthService::new(db);

    let result = service.bootstrap(&codes, bootstrap_dto("guess", "root")).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidBootstrapCode))
    ));

    let admin = service.bootstrap(&codes, bootstrap_dto(&code, "root")).await?;
    assert!(!codes.is_pending().await);
    let current = login_as(db, session, admin.id).await?;
    assert!(current.is_super_admin);
    service.login("root", "secret1").await?;

    let result = service.bootstrap(&codes, bootstrap_dto(&code, "root2")).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AlreadyBootstrapped))
    ));

    let fresh = codes.generate().await;
    let result = service.bootstrap(&codes, bootstrap_dto(&fresh, "root3")).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AlreadyBootstrapped))
    ));

    Ok(())
}

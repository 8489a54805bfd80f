use crate::server::{
    error::AppError,
    middleware::{
        auth::{AuthGuard, CurrentUser},
        session::AuthSession,
    },
};
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, factory};
use tower_sessions::Session;

mod assessment;
mod attendance;
mod auth;
mod balance;
mod broadcast;
mod chat;
mod clock;
mod department;
mod inventory;
mod memo;
mod reimbursement;
mod schedule;
mod vacation;

/// Resolves `user_id` the way a request handler would.
async fn login_as(
    db: &DatabaseConnection,
    session: &Session,
    user_id: i32,
) -> Result<CurrentUser, AppError> {
    AuthSession::new(session).set_user_id(user_id).await?;
    AuthGuard::new(db, session).require(&[]).await
}

/// A user holding a role with `permissions` that covers `department_id`.
async fn manager_of(
    db: &DatabaseConnection,
    department_id: i32,
    permissions: &[&str],
) -> Result<entity::user::Model, AppError> {
    let user = factory::user::create_user_in_department(db, department_id).await?;
    let role = factory::role::RoleFactory::new(db)
        .permissions(permissions)
        .departments(&[department_id])
        .build()
        .await?;
    factory::assign_role(db, user.id, role.id).await?;
    Ok(user)
}

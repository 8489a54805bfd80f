use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::auth::{BootstrapDto, ProfileDto},
    server::{
        data::{employee::EmployeeRepository, role::RoleRepository, user::UserRepository},
        error::{auth::AuthError, AppError},
        middleware::auth::CurrentUser,
        model::{employee::CreateUserParams, role::CreateRoleParams},
        service::bootstrap::BootstrapCodeService,
        util::{
            password::{hash_password, verify_password},
            validate::required_text,
        },
    },
};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const SUPER_ADMIN_ROLE_NAME: &str = "Super Administrator";

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Verifies credentials and records the login time.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<entity::user::Model, AppError> {
        let user_repo = UserRepository::new(self.db);

        let Some(user) = user_repo.find_by_username(username.trim()).await? else {
            return Err(AuthError::InvalidCredentials.into());
        };
        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }
        if user.status != "active" {
            return Err(AuthError::AccountDisabled(user.id).into());
        }

        Ok(user_repo.touch_last_login(user.id).await?)
    }

    pub async fn profile(&self, current: &CurrentUser) -> Result<ProfileDto, AppError> {
        let employee = EmployeeRepository::new(self.db)
            .find_by_user_id(current.id())
            .await?;

        let mut permissions: Vec<String> = current.permissions.iter().cloned().collect();
        permissions.sort();

        Ok(ProfileDto {
            id: current.user.id,
            username: current.user.username.clone(),
            real_name: current.user.real_name.clone(),
            email: current.user.email.clone(),
            phone: current.user.phone.clone(),
            department_id: current.user.department_id,
            employee_id: employee.map(|e| e.id),
            is_super_admin: current.is_super_admin,
            permissions,
            viewable_department_ids: current.scope.department_ids(),
            last_login_at: current.user.last_login_at,
        })
    }

    pub async fn change_password(
        &self,
        user: &entity::user::Model,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        validate_password(new_password)?;
        if !verify_password(old_password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials.into());
        }

        UserRepository::new(self.db)
            .update_password(user.id, hash_password(new_password)?)
            .await?;

        Ok(())
    }

    /// Creates the first super administrator using the one-time bootstrap code.
    ///
    /// The super-admin role is created when missing. Fails with `AlreadyBootstrapped`
    /// once any super administrator exists.
    pub async fn bootstrap(
        &self,
        codes: &BootstrapCodeService,
        dto: BootstrapDto,
    ) -> Result<entity::user::Model, AppError> {
        if RoleRepository::new(self.db).super_admin_exists().await? {
            return Err(AuthError::AlreadyBootstrapped.into());
        }

        let username = required_text("username", &dto.username, 50)?;
        let real_name = required_text("real_name", &dto.real_name, 50)?;
        validate_password(&dto.password)?;

        let password_hash = hash_password(&dto.password)?;

        if !codes.consume(dto.code.trim()).await {
            return Err(AuthError::InvalidBootstrapCode.into());
        }

        let txn = self.db.begin().await?;
        let role_repo = RoleRepository::new(&txn);
        let user_repo = UserRepository::new(&txn);

        if user_repo.find_by_username(&username).await?.is_some() {
            return Err(AppError::bad_request("Username already exists"));
        }

        let role_id = match role_repo.find_super_admin_role().await? {
            Some(role) => role.id,
            None => {
                role_repo
                    .create(CreateRoleParams {
                        name: SUPER_ADMIN_ROLE_NAME.to_string(),
                        description: Some("Full access to every module".to_string()),
                        is_super_admin: true,
                        permission_ids: Vec::new(),
                        department_ids: Vec::new(),
                    })
                    .await?
                    .id
            }
        };

        let user = user_repo
            .create(CreateUserParams {
                username,
                password_hash,
                real_name,
                email: None,
                phone: None,
                department_id: None,
            })
            .await?;
        role_repo.set_user_roles(user.id, &[role_id]).await?;

        txn.commit().await?;

        tracing::info!("Created super administrator {} ({})", user.username, user.id);

        Ok(user)
    }
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct LoginDto {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct ChangePasswordDto {
    pub old_password: String,
    pub new_password: String,
}

/// First-run request creating the initial super administrator.
#[derive(Serialize, Deserialize, Clone, Debug, ToSchema)]
pub struct BootstrapDto {
    /// One-time code printed in the server log at startup.
    pub code: String,
    pub username: String,
    pub password: String,
    pub real_name: String,
}

/// The logged in user's profile and effective access.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct ProfileDto {
    pub id: i32,
    pub username: String,
    pub real_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department_id: Option<i32>,
    pub employee_id: Option<i32>,
    pub is_super_admin: bool,
    pub permissions: Vec<String>,
    /// `null` when every department is viewable.
    pub viewable_department_ids: Option<Vec<i32>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

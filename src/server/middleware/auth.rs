//! Authentication guard and permission model.
//!
//! Every protected handler builds an `AuthGuard` from the shared state and session and
//! calls `require` with the permissions the operation needs. The guard resolves the
//! session user, loads their roles once and returns a `CurrentUser` carrying the
//! permission codes and the department scope used for row-level filtering.

use std::collections::{BTreeSet, HashSet};

use sea_orm::DatabaseConnection;
use tower_sessions::Session;

use crate::server::{
    data::{role::RoleRepository, user::UserRepository},
    error::{auth::AuthError, AppError},
    middleware::session::AuthSession,
};

/// Permission codes understood by the guard.
///
/// The catalogue is seeded by migration; codes must match the `permission.code` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    EmployeeView,
    EmployeeManage,
    DepartmentManage,
    RoleManage,
    VacationManage,
    AttendanceApprove,
    ScheduleManage,
    AssessmentManage,
    BroadcastSend,
    MemoSend,
    ExportData,
    SystemManage,
    ReimbursementApprove,
    InventoryManage,
}

impl Permission {
    pub const ALL: [Permission; 14] = [
        Permission::EmployeeView,
        Permission::EmployeeManage,
        Permission::DepartmentManage,
        Permission::RoleManage,
        Permission::VacationManage,
        Permission::AttendanceApprove,
        Permission::ScheduleManage,
        Permission::AssessmentManage,
        Permission::BroadcastSend,
        Permission::MemoSend,
        Permission::ExportData,
        Permission::SystemManage,
        Permission::ReimbursementApprove,
        Permission::InventoryManage,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::EmployeeView => "employee:view",
            Self::EmployeeManage => "employee:manage",
            Self::DepartmentManage => "department:manage",
            Self::RoleManage => "role:manage",
            Self::VacationManage => "vacation:manage",
            Self::AttendanceApprove => "attendance:approve",
            Self::ScheduleManage => "schedule:manage",
            Self::AssessmentManage => "assessment:manage",
            Self::BroadcastSend => "broadcast:send",
            Self::MemoSend => "memo:send",
            Self::ExportData => "export:data",
            Self::SystemManage => "system:manage",
            Self::ReimbursementApprove => "reimbursement:approve",
            Self::InventoryManage => "inventory:manage",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

/// Departments whose rows a user may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentScope {
    /// Super administrators see every department.
    All,
    /// Union of role departments, or the user's own department, or nothing.
    Departments(BTreeSet<i32>),
}

impl DepartmentScope {
    /// Whether a row in `department_id` is visible. Rows without a department are only
    /// visible to an unrestricted scope.
    pub fn contains(&self, department_id: Option<i32>) -> bool {
        match (self, department_id) {
            (Self::All, _) => true,
            (Self::Departments(ids), Some(id)) => ids.contains(&id),
            (Self::Departments(_), None) => false,
        }
    }

    /// Whether every department in `department_ids` is visible.
    pub fn covers(&self, department_ids: &[i32]) -> bool {
        department_ids.iter().all(|id| self.contains(Some(*id)))
    }

    /// Visible department ids for query filters; `None` means unrestricted.
    pub fn department_ids(&self) -> Option<Vec<i32>> {
        match self {
            Self::All => None,
            Self::Departments(ids) => Some(ids.iter().copied().collect()),
        }
    }

    /// Restricts an optional requested department to the scope.
    ///
    /// Returns the ids to filter by: the requested one when visible, an empty list when
    /// it is outside the scope, or the whole scope when nothing was requested.
    pub fn narrow(&self, requested: Option<i32>) -> Option<Vec<i32>> {
        match requested {
            Some(id) if self.contains(Some(id)) => Some(vec![id]),
            Some(_) => Some(Vec::new()),
            None => self.department_ids(),
        }
    }
}

/// The authenticated caller with resolved roles.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: entity::user::Model,
    pub is_super_admin: bool,
    pub permissions: HashSet<String>,
    pub scope: DepartmentScope,
}

impl CurrentUser {
    pub fn id(&self) -> i32 {
        self.user.id
    }

    /// Whether the user holds the permission. Super administrators hold all of them.
    pub fn has(&self, permission: Permission) -> bool {
        self.is_super_admin || self.permissions.contains(permission.code())
    }

    /// Fails with `AccessDenied` unless the user holds the permission.
    pub fn require(&self, permission: Permission) -> Result<(), AppError> {
        if self.has(permission) {
            return Ok(());
        }
        Err(AuthError::AccessDenied(
            self.id(),
            format!("missing permission {}", permission.code()),
        )
        .into())
    }

    /// Row-level visibility: department in scope or the row belongs to the user.
    pub fn can_see(&self, department_id: Option<i32>, owner_user_id: i32) -> bool {
        owner_user_id == self.id() || self.scope.contains(department_id)
    }

    /// Fails with `AccessDenied` unless `can_see` holds.
    pub fn require_visible(
        &self,
        department_id: Option<i32>,
        owner_user_id: i32,
    ) -> Result<(), AppError> {
        if self.can_see(department_id, owner_user_id) {
            return Ok(());
        }
        Err(AuthError::AccessDenied(
            self.id(),
            format!("department {:?} is outside the viewable scope", department_id),
        )
        .into())
    }
}

pub struct AuthGuard<'a> {
    db: &'a DatabaseConnection,
    session: &'a Session,
}

impl<'a> AuthGuard<'a> {
    pub fn new(db: &'a DatabaseConnection, session: &'a Session) -> Self {
        Self { db, session }
    }

    /// Resolves the session user and checks every permission in `permissions`.
    ///
    /// # Returns
    /// - `Ok(CurrentUser)` - Logged in, active and holding all permissions
    /// - `Err(AuthError::NotAuthenticated)` - No user in session
    /// - `Err(AuthError::UserNotInDatabase)` - Session user no longer exists
    /// - `Err(AuthError::AccountDisabled)` - Account deactivated after login
    /// - `Err(AuthError::AccessDenied)` - A permission is missing
    pub async fn require(&self, permissions: &[Permission]) -> Result<CurrentUser, AppError> {
        let Some(user_id) = AuthSession::new(self.session).get_user_id().await? else {
            return Err(AuthError::NotAuthenticated.into());
        };

        let Some(user) = UserRepository::new(self.db).find_by_id(user_id).await? else {
            return Err(AuthError::UserNotInDatabase(user_id).into());
        };

        if user.status != "active" {
            return Err(AuthError::AccountDisabled(user_id).into());
        }

        let current = load_current_user(self.db, user).await?;

        for permission in permissions {
            current.require(*permission)?;
        }

        Ok(current)
    }
}

/// Loads roles, permission codes and the department scope for a user.
pub async fn load_current_user(
    db: &DatabaseConnection,
    user: entity::user::Model,
) -> Result<CurrentUser, AppError> {
    let access = RoleRepository::new(db).access_for_user(user.id).await?;

    let scope = if access.is_super_admin {
        DepartmentScope::All
    } else if !access.department_ids.is_empty() {
        DepartmentScope::Departments(access.department_ids.into_iter().collect())
    } else {
        DepartmentScope::Departments(user.department_id.into_iter().collect())
    };

    Ok(CurrentUser {
        is_super_admin: access.is_super_admin,
        permissions: access.permission_codes.into_iter().collect(),
        scope,
        user,
    })
}

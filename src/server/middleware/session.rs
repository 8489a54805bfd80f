//! Type-safe session management wrappers.
//!
//! The session only carries the authenticated user's id. Wrapping `Session` keeps the
//! key in one place and the stored type consistent across handlers and the guard.

use tower_sessions::Session;

use crate::server::error::AppError;

const SESSION_AUTH_USER_ID: &str = "auth:user";

/// Authentication session management.
///
/// Handles storing and retrieving the authenticated user's id and session
/// lifecycle operations.
pub struct AuthSession<'a> {
    /// The underlying tower-sessions Session instance.
    session: &'a Session,
}

impl<'a> AuthSession<'a> {
    /// Creates a new AuthSession wrapper.
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Stores the user's id in the session.
    ///
    /// Called after successful login to establish a logged-in session.
    ///
    /// # Returns
    /// - `Ok(())` - User ID successfully stored
    /// - `Err(AppError::SessionErr(_))` - Failed to store in session
    pub async fn set_user_id(&self, user_id: i32) -> Result<(), AppError> {
        self.session.insert(SESSION_AUTH_USER_ID, user_id).await?;
        Ok(())
    }

    /// Retrieves the user's id from the session.
    ///
    /// # Returns
    /// - `Ok(Some(user_id))` - User is logged in
    /// - `Ok(None)` - No user in session (not logged in)
    /// - `Err(AppError::SessionErr(_))` - Failed to access session
    pub async fn get_user_id(&self) -> Result<Option<i32>, AppError> {
        Ok(self.session.get::<i32>(SESSION_AUTH_USER_ID).await?)
    }

    /// Issues a new session id, keeping the data. Used on login against fixation.
    pub async fn cycle_id(&self) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        Ok(())
    }

    /// Clears all data from the session.
    pub async fn clear(&self) {
        self.session.clear().await;
    }
}

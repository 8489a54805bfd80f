use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::model::api::ErrorDto;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No user id is stored in the session.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("Request is not associated with a logged in user")]
    NotAuthenticated,

    /// The session references a user id that no longer exists.
    ///
    /// Results in a 401 Unauthorized response so the client logs in again.
    #[error("User {0} in session does not exist in the database")]
    UserNotInDatabase(i32),

    /// Username and password did not match.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The account exists but has been deactivated.
    ///
    /// Results in a 401 Unauthorized response.
    #[error("User {0} is inactive")]
    AccountDisabled(i32),

    /// User lacks the permission or department scope for the operation.
    ///
    /// The message is logged; the client only receives a generic 403.
    ///
    /// # Fields
    /// - User id that was denied
    /// - Description of what was attempted
    #[error("User {0} denied access: {1}")]
    AccessDenied(i32, String),

    /// The bootstrap code is unknown, expired or already used.
    ///
    /// Results in a 403 Forbidden response.
    #[error("Invalid or expired bootstrap code")]
    InvalidBootstrapCode,

    /// A super administrator already exists, bootstrap is closed.
    ///
    /// Results in a 403 Forbidden response.
    #[error("A super administrator already exists")]
    AlreadyBootstrapped,
}

/// Converts authentication errors into HTTP responses.
///
/// Maps authentication errors to appropriate HTTP status codes and user-friendly error messages:
/// - `NotAuthenticated` / `UserNotInDatabase` / `AccountDisabled` → 401 with "Not logged in"
///   or a disabled-account message
/// - `InvalidCredentials` → 401 with "Invalid username or password"
/// - `AccessDenied` → 403 with "Access denied"
/// - `InvalidBootstrapCode` / `AlreadyBootstrapped` → 403
///
/// Denials are logged at debug level for diagnostics while keeping client-facing messages
/// generic to avoid information leakage.
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NotAuthenticated | Self::UserNotInDatabase(_) => {
                (StatusCode::UNAUTHORIZED, "Not logged in")
            }
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid username or password"),
            Self::AccountDisabled(_) => (StatusCode::UNAUTHORIZED, "Account is disabled"),
            Self::AccessDenied(_, _) => (StatusCode::FORBIDDEN, "Access denied"),
            Self::InvalidBootstrapCode => (StatusCode::FORBIDDEN, "Invalid or expired code"),
            Self::AlreadyBootstrapped => {
                (StatusCode::FORBIDDEN, "A super administrator already exists")
            }
        };

        tracing::debug!("{}", self);

        (status, Json(ErrorDto::new(message))).into_response()
    }
}

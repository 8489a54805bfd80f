use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ApiResponse, ErrorDto, MessageDto},
        auth::{BootstrapDto, ChangePasswordDto, LoginDto, ProfileDto},
    },
    server::{
        error::AppError,
        middleware::{
            auth::{load_current_user, AuthGuard},
            session::AuthSession,
        },
        service::auth::AuthService,
        state::AppState,
    },
};

/// Tag for grouping auth endpoints in OpenAPI documentation
pub static AUTH_TAG: &str = "auth";

/// Log in with username and password.
///
/// Verifies the credentials, cycles the session id and stores the user in the
/// session. Unknown usernames and wrong passwords are indistinguishable.
///
/// # Returns
/// - `200 OK` - Profile of the logged in user with permissions and viewable departments
/// - `401 Unauthorized` - Invalid credentials or disabled account
/// - `429 Too Many Requests` - Rate limit exceeded
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = AUTH_TAG,
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = ApiResponse<ProfileDto>),
        (status = 401, description = "Invalid credentials or disabled account", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginDto>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&state.db);
    let user = service.login(&payload.username, &payload.password).await?;

    let auth_session = AuthSession::new(&session);
    auth_session.cycle_id().await?;
    auth_session.set_user_id(user.id).await?;

    tracing::info!("User {} logged in", user.id);

    let current = load_current_user(&state.db, user).await?;
    let profile = service.profile(&current).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(profile))))
}

/// Log out by clearing the session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Logged out", body = MessageDto)
    ),
)]
pub async fn logout(session: Session) -> Result<impl IntoResponse, AppError> {
    AuthSession::new(&session).clear().await;

    Ok((StatusCode::OK, Json(MessageDto::new("Logged out"))))
}

/// Get the logged in user's profile.
///
/// # Returns
/// - `200 OK` - Profile with permission codes and viewable department ids
/// - `401 Unauthorized` - Not logged in
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = AUTH_TAG,
    responses(
        (status = 200, description = "Current profile", body = ApiResponse<ProfileDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn me(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    let profile = AuthService::new(&state.db).profile(&current).await?;

    Ok((StatusCode::OK, Json(ApiResponse::ok(profile))))
}

/// Change the logged in user's password.
///
/// # Returns
/// - `200 OK` - Password changed
/// - `400 Bad Request` - New password too short
/// - `401 Unauthorized` - Not logged in or old password wrong
#[utoipa::path(
    put,
    path = "/api/auth/password",
    tag = AUTH_TAG,
    request_body = ChangePasswordDto,
    responses(
        (status = 200, description = "Password changed", body = MessageDto),
        (status = 400, description = "New password too short", body = ErrorDto),
        (status = 401, description = "Not logged in or old password wrong", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_password(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<ChangePasswordDto>,
) -> Result<impl IntoResponse, AppError> {
    let current = AuthGuard::new(&state.db, &session).require(&[]).await?;

    AuthService::new(&state.db)
        .change_password(&current.user, &payload.old_password, &payload.new_password)
        .await?;

    Ok((StatusCode::OK, Json(MessageDto::new("Password changed"))))
}

/// Create the first super administrator with the one-time code from the server log.
///
/// The new administrator is logged in immediately.
///
/// # Returns
/// - `201 Created` - Profile of the new super administrator
/// - `400 Bad Request` - Invalid username, name or password
/// - `403 Forbidden` - Code invalid or expired, or a super administrator already exists
#[utoipa::path(
    post,
    path = "/api/auth/bootstrap",
    tag = AUTH_TAG,
    request_body = BootstrapDto,
    responses(
        (status = 201, description = "Super administrator created", body = ApiResponse<ProfileDto>),
        (status = 400, description = "Invalid input", body = ErrorDto),
        (status = 403, description = "Invalid code or already bootstrapped", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn bootstrap(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<BootstrapDto>,
) -> Result<impl IntoResponse, AppError> {
    let service = AuthService::new(&state.db);
    let user = service.bootstrap(&state.bootstrap_codes, payload).await?;

    let auth_session = AuthSession::new(&session);
    auth_session.cycle_id().await?;
    auth_session.set_user_id(user.id).await?;

    let current = load_current_user(&state.db, user).await?;
    let profile = service.profile(&current).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

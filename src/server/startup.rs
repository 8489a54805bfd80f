use sea_orm::DatabaseConnection;
use tower_sessions::{cookie::SameSite, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::server::{
    config::Config, data::role::RoleRepository, error::AppError,
    service::bootstrap::BootstrapCodeService,
};

/// Sessions expire after this many days without a request.
const SESSION_INACTIVITY_DAYS: i64 = 7;

/// Connects to the Sqlite database and runs pending migrations.
///
/// Migrations also seed the permission catalogue, so the guard can resolve permission
/// codes as soon as this returns.
pub async fn connect_to_database(config: &Config) -> Result<DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the session layer backed by a `SqliteStore` on the application's pool.
pub async fn connect_to_session(
    db: &DatabaseConnection,
) -> Result<SessionManagerLayer<SqliteStore>, AppError> {
    let pool = db.get_sqlite_connection_pool().clone();
    let store = SqliteStore::new(pool);
    store
        .migrate()
        .await
        .map_err(|e| AppError::InternalError(format!("session store migration failed: {}", e)))?;

    Ok(SessionManagerLayer::new(store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            SESSION_INACTIVITY_DAYS,
        ))))
}

/// Issues and logs a bootstrap code when no super administrator exists yet.
///
/// Returns whether a code was issued.
pub async fn check_for_super_admin(
    db: &DatabaseConnection,
    config: &Config,
    bootstrap_codes: &BootstrapCodeService,
) -> Result<bool, AppError> {
    if RoleRepository::new(db).super_admin_exists().await? {
        return Ok(false);
    }

    let code = bootstrap_codes.generate().await;

    tracing::info!(
        "No super administrator exists. POST {}/api/auth/bootstrap with code {} within 60 seconds to create one.",
        config.app_url,
        code
    );

    Ok(true)
}

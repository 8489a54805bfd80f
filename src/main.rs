mod model;
mod server;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::server::{
    config::Config, error::AppError, model::clock::ClockRules, push::PushHub, router,
    scheduler::notification_cleanup, service::bootstrap::BootstrapCodeService, startup,
    state::AppState, util::time::offset_from_hours,
};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let session = startup::connect_to_session(&db).await?;

    let bootstrap_codes = BootstrapCodeService::new();
    startup::check_for_super_admin(&db, &config, &bootstrap_codes).await?;

    let scheduler_db = db.clone();
    let retention_days = config.notification_retention_days;
    tokio::spawn(async move {
        if let Err(e) = notification_cleanup::start_scheduler(scheduler_db, retention_days).await
        {
            tracing::error!("Notification cleanup scheduler error: {}", e);
        }
    });

    let utc_offset = offset_from_hours(config.utc_offset_hours);
    let state = AppState::new(
        db,
        bootstrap_codes,
        PushHub::new(),
        utc_offset,
        ClockRules {
            offset: utc_offset,
            late_minutes: config.clock_late_minutes,
            early_leave_minutes: config.clock_early_leave_minutes,
        },
        config.app_url.clone(),
    );
    let app = router::router(&config)?.layer(session).with_state(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

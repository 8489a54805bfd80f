//! Application state shared across all request handlers.
//!
//! All fields are cheap to clone: the connection is a pool, the bootstrap code service
//! and push hub share their state through `Arc`.

use chrono::FixedOffset;
use sea_orm::DatabaseConnection;

use super::{model::clock::ClockRules, push::PushHub, service::bootstrap::BootstrapCodeService};

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    /// One-time code that lets the first super administrator register.
    pub bootstrap_codes: BootstrapCodeService,
    pub push: PushHub,
    /// Office offset defining "today" and the current year.
    pub utc_offset: FixedOffset,
    /// Late and early-leave thresholds for clock-in and clock-out.
    pub clock_rules: ClockRules,
    pub app_url: String,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        bootstrap_codes: BootstrapCodeService,
        push: PushHub,
        utc_offset: FixedOffset,
        clock_rules: ClockRules,
        app_url: String,
    ) -> Self {
        Self {
            db,
            bootstrap_codes,
            push,
            utc_offset,
            clock_rules,
            app_url,
        }
    }
}

use std::str::FromStr;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_APP_URL: &str = "http://localhost:3001";
const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
const DEFAULT_NOTIFICATION_RETENTION_DAYS: i64 = 30;
const DEFAULT_CLOCK_GRACE_MINUTES: i64 = 30;

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub app_url: String,

    /// Allowed CORS origin; any origin when unset.
    pub cors_origin: Option<String>,

    /// Offset of the office's local time from UTC, used for "today" and the current year.
    pub utc_offset_hours: i32,
    pub notification_retention_days: i64,

    /// Minutes after shift start before a clock-in counts as late.
    pub clock_late_minutes: i64,
    /// Minutes before shift end before a clock-out counts as leaving early.
    pub clock_early_leave_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            app_url: std::env::var("APP_URL").unwrap_or_else(|_| DEFAULT_APP_URL.to_string()),
            cors_origin: std::env::var("CORS_ORIGIN").ok().filter(|v| !v.is_empty()),
            utc_offset_hours: parse_var("UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS)?,
            notification_retention_days: parse_var(
                "NOTIFICATION_RETENTION_DAYS",
                DEFAULT_NOTIFICATION_RETENTION_DAYS,
            )?,
            clock_late_minutes: parse_var("CLOCK_LATE_MINUTES", DEFAULT_CLOCK_GRACE_MINUTES)?,
            clock_early_leave_minutes: parse_var(
                "CLOCK_EARLY_LEAVE_MINUTES",
                DEFAULT_CLOCK_GRACE_MINUTES,
            )?,
        })
    }
}

/// Reads an optional numeric environment variable, falling back to `default` when unset.
fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidEnvVar(name.to_string(), value)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_when_unset() {
        let value: i32 = parse_var("HRDESK_TEST_UNSET_VARIABLE", 8).unwrap();

        assert_eq!(value, 8);
    }

    #[test]
    fn rejects_non_numeric_value() {
        std::env::set_var("HRDESK_TEST_BAD_OFFSET", "eight");

        let result: Result<i32, _> = parse_var("HRDESK_TEST_BAD_OFFSET", 8);

        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }
}

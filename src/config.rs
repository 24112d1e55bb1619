use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::AppError;
use crate::remote::RemoteConfig;

const DEFAULT_DATABASE_URL: &str = "sqlite://exam_dashboard.db";
const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:3000";
const DEFAULT_REMINDER_INTERVAL_SECS: u64 = 30;
const REMOTE_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug, Default)]
pub struct AdminCredentials {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_address: SocketAddr,
    pub remote: Option<RemoteConfig>,
    pub admin: AdminCredentials,
    pub reminder_interval: Duration,
    pub notify_webhook_url: Option<String>,
}

impl Config {
    pub fn new_from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let bind_address = env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("BIND_ADDRESS is invalid: {}", e)))?;

        let remote = non_empty_var("REMOTE_URL").map(|base_url| RemoteConfig {
            base_url,
            api_key: env::var("REMOTE_API_KEY").unwrap_or_default(),
            timeout: REMOTE_TIMEOUT,
        });

        let admin = AdminCredentials {
            email: non_empty_var("ADMIN_EMAIL"),
            password: non_empty_var("ADMIN_PASSWORD"),
        };

        let reminder_interval = match non_empty_var("REMINDER_INTERVAL_SECS") {
            Some(raw) => parse_interval(&raw)?,
            None => Duration::from_secs(DEFAULT_REMINDER_INTERVAL_SECS),
        };

        Ok(Self {
            database_url,
            bind_address,
            remote,
            admin,
            reminder_interval,
            notify_webhook_url: non_empty_var("NOTIFY_WEBHOOK_URL"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_interval(raw: &str) -> Result<Duration, AppError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(AppError::Config(format!(
            "REMINDER_INTERVAL_SECS must be a positive integer, got {:?}",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_must_be_positive() {
        assert_eq!(parse_interval("30").unwrap(), Duration::from_secs(30));
        assert!(parse_interval("0").is_err());
        assert!(parse_interval("soon").is_err());
    }
}

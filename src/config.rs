// src/config.rs

use std::{env, time::Duration};

use dotenvy::dotenv;
use thiserror::Error;

/// Minimum scored attempts before a trend is reported.
pub const MIN_TREND_ATTEMPTS: usize = 4;

/// Percentage change beyond which a trend counts as improving or declining.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub rust_log: String,
    pub bind_addr: String,
    pub log_dir: String,

    /// Size of the "recent attempts" list on the dashboard.
    pub recent_attempts_limit: usize,

    /// Length of one session timer tick, in milliseconds.
    pub timer_tick_ms: u64,

    /// How long a finalized session stays queryable, in seconds.
    pub session_retention_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            rust_log,
            bind_addr,
            log_dir,
            recent_attempts_limit: number("RECENT_ATTEMPTS_LIMIT", 10)?,
            timer_tick_ms: number("TIMER_TICK_MS", 1000)?,
            session_retention_secs: number("SESSION_RETENTION_SECS", 600)?,
        })
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_ms)
    }

    pub fn session_retention(&self) -> Duration {
        Duration::from_secs(self.session_retention_secs)
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name))
}

fn number<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => parse_number(name, &value),
        Err(_) => Ok(default),
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numbers_with_whitespace() {
        let n: u64 = parse_number("TIMER_TICK_MS", " 250 ").unwrap();
        assert_eq!(n, 250);
    }

    #[test]
    fn rejects_malformed_numbers() {
        let err = parse_number::<usize>("RECENT_ATTEMPTS_LIMIT", "ten").unwrap_err();
        assert!(err.to_string().contains("RECENT_ATTEMPTS_LIMIT"));
    }
}

// * Runtime settings loaded once at startup
// * Values come from the process environment (optionally seeded from a .env file)

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

use crate::config::constants::{
    DEFAULT_BIND_ADDR, DEFAULT_MAX_RESULTS, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS,
    REQUEST_TIMEOUT_SECS,
};

pub const ENV_BIND: &str = "CDP_DOCS_BIND";
pub const ENV_MAX_RETRIES: &str = "CDP_DOCS_MAX_RETRIES";
pub const ENV_RETRY_DELAY_MS: &str = "CDP_DOCS_RETRY_DELAY_MS";
pub const ENV_TIMEOUT_SECS: &str = "CDP_DOCS_TIMEOUT_SECS";
pub const ENV_MAX_RESULTS: &str = "CDP_DOCS_MAX_RESULTS";
pub const ENV_LOG: &str = "CDP_DOCS_LOG";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
}

/// Service-wide knobs for the fetcher, search and HTTP surface
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub request_timeout: Duration,
    pub max_results: usize,
    pub log_filter: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR
                .parse()
                .unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 5000))),
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            max_results: DEFAULT_MAX_RESULTS,
            log_filter: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Loads `.env` (if present) and reads the `CDP_DOCS_*` variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // * A missing .env file is the normal case
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup; missing keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BIND) {
            config.bind_addr = parse_value(ENV_BIND, &raw)?;
        }
        if let Some(raw) = lookup(ENV_MAX_RETRIES) {
            config.max_retries = parse_value(ENV_MAX_RETRIES, &raw)?;
        }
        if let Some(raw) = lookup(ENV_RETRY_DELAY_MS) {
            config.retry_delay = Duration::from_millis(parse_value(ENV_RETRY_DELAY_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_value(ENV_TIMEOUT_SECS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_MAX_RESULTS) {
            config.max_results = parse_value(ENV_MAX_RESULTS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LOG) {
            if !raw.trim().is_empty() {
                config.log_filter = raw.trim().to_string();
            }
        }

        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        key,
        value: raw.to_string(),
    })
}

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Source endpoint used when `API_A_URL` is not set.
pub const DEFAULT_SOURCE_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Destination API URL that matching users are POSTed to (required)
    pub destination_url: String,

    /// Source API URL users are fetched from
    pub source_url: String,

    /// Per-request timeout for the shared HTTP client (default: 10)
    pub http_timeout_secs: u64,

    /// Delivery attempts per user before giving up (default: 3)
    pub max_attempts: u32,

    /// Wait between failed delivery attempts in milliseconds (default: 2000)
    pub retry_delay_ms: u64,

    /// Emit logs as JSON lines instead of plain text
    pub log_json: bool,
}

impl AppConfig {
    /// Load configuration from environment variables, reading `.env` first.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = load_dotenv() {
            tracing::debug!(error = %e, "No .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let max_attempts: u32 = parse_or(get("DELIVERY_MAX_ATTEMPTS"), "DELIVERY_MAX_ATTEMPTS", 3)?;
        if max_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "DELIVERY_MAX_ATTEMPTS",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            destination_url: get("API_B_URL").ok_or(ConfigError::MissingDestinationUrl)?,
            source_url: get("API_A_URL").unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            http_timeout_secs: parse_or(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 10)?,
            max_attempts,
            retry_delay_ms: parse_or(get("DELIVERY_RETRY_DELAY_MS"), "DELIVERY_RETRY_DELAY_MS", 2000)?,
            log_json: parse_or(get("LOG_JSON"), "LOG_JSON", false)?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Load a `.env` file into the process environment.
///
/// Callers that load before logging is set up should hold on to the error
/// and report it once a subscriber exists.
pub fn load_dotenv() -> Result<PathBuf, dotenvy::Error> {
    dotenvy::dotenv()
}

/// Load a named env file into the process environment.
pub fn load_dotenv_file(filename: &str) -> Result<PathBuf, dotenvy::Error> {
    dotenvy::from_filename(filename)
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

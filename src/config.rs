use crate::error::ConfigError;
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HOLDINGS_FILE: &str = "holdings.json";

/// Runtime settings, read from the environment (and an optional `.env`).
#[derive(Debug, Clone)]
pub struct Settings {
    pub coingecko_base_url: String,
    /// How long a successful refresh keeps the whole cache fresh.
    pub cache_ttl: Duration,
    pub request_timeout: Duration,
    pub holdings_file: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            coingecko_base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            holdings_file: PathBuf::from(DEFAULT_HOLDINGS_FILE),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        if dotenv::dotenv().is_ok() {
            debug!("Loaded .env file");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup("COINGECKO_BASE_URL") {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key: "COINGECKO_BASE_URL",
                    reason: "must not be empty".to_string(),
                });
            }
            settings.coingecko_base_url = url.to_string();
        }
        if let Some(raw) = lookup("PRICE_CACHE_TTL_SECS") {
            settings.cache_ttl = parse_secs("PRICE_CACHE_TTL_SECS", &raw)?;
        }
        if let Some(raw) = lookup("PRICE_REQUEST_TIMEOUT_SECS") {
            settings.request_timeout = parse_secs("PRICE_REQUEST_TIMEOUT_SECS", &raw)?;
        }
        if let Some(path) = lookup("HOLDINGS_FILE") {
            settings.holdings_file = PathBuf::from(path.trim());
        }

        Ok(settings)
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs: u64 = raw.trim().parse().map_err(|e| ConfigError::InvalidValue {
        key,
        reason: format!("{:?} is not a whole number of seconds ({})", raw, e),
    })?;
    if secs == 0 {
        return Err(ConfigError::InvalidValue {
            key,
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}

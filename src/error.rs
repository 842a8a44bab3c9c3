use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error;

/// Failures talking to the upstream price service.
///
/// These never reach callers of `PriceService::get_prices`; the coordinator
/// logs them and falls back to cached prices.
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("Rate limit reached (HTTP 429)")]
    RateLimited,

    #[error("Upstream returned HTTP {0}")]
    Status(StatusCode),

    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed price response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Upstream did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

impl PriceError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, PriceError::RateLimited)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum HoldingError {
    #[error("Failed to read holdings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse holdings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid holding {symbol:?}: {reason}")]
    Invalid { symbol: String, reason: String },
}

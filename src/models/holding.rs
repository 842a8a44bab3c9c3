use crate::error::HoldingError;
use serde::Deserialize;
use std::path::Path;

pub const MAX_SYMBOL_LEN: usize = 100;
pub const MAX_TICKER_LEN: usize = 10;
pub const MAX_QUANTITY: f64 = 1_000_000_000.0;
pub const MAX_BUY_PRICE: f64 = 100_000_000.0;

/// A recorded position in one asset.
///
/// `symbol` is the price service identifier (e.g. "bitcoin"), `ticker` the
/// trading ticker (e.g. "BTC").
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Holding {
    pub symbol: String,
    pub ticker: String,
    pub quantity: f64,
    pub buy_price: f64,
}

impl Holding {
    pub fn new(
        symbol: &str,
        ticker: &str,
        quantity: f64,
        buy_price: f64,
    ) -> Result<Self, HoldingError> {
        Self {
            symbol: symbol.to_string(),
            ticker: ticker.to_string(),
            quantity,
            buy_price,
        }
        .normalized()
    }

    /// Trims and re-cases the names, then checks the bounds.
    pub fn normalized(self) -> Result<Self, HoldingError> {
        let symbol = self.symbol.trim().to_lowercase();
        let ticker = self.ticker.trim().to_uppercase();
        let invalid = |reason: String| HoldingError::Invalid {
            symbol: symbol.clone(),
            reason,
        };

        if symbol.is_empty() || symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(invalid(format!("symbol must be 1 to {} characters", MAX_SYMBOL_LEN)));
        }
        if ticker.is_empty() || ticker.chars().count() > MAX_TICKER_LEN {
            return Err(invalid(format!("ticker must be 1 to {} characters", MAX_TICKER_LEN)));
        }
        if !(self.quantity > 0.0 && self.quantity <= MAX_QUANTITY) {
            return Err(invalid(format!("quantity {} out of range", self.quantity)));
        }
        if !(self.buy_price > 0.0 && self.buy_price <= MAX_BUY_PRICE) {
            return Err(invalid(format!("buy price {} out of range", self.buy_price)));
        }

        Ok(Self {
            symbol,
            ticker,
            quantity: self.quantity,
            buy_price: self.buy_price,
        })
    }
}

/// Reads a JSON array of holdings, normalizing every entry.
pub fn load_holdings(path: impl AsRef<Path>) -> Result<Vec<Holding>, HoldingError> {
    let content = std::fs::read_to_string(path)?;
    parse_holdings(&content)
}

pub fn parse_holdings(json: &str) -> Result<Vec<Holding>, HoldingError> {
    let raw: Vec<Holding> = serde_json::from_str(json)?;
    raw.into_iter().map(Holding::normalized).collect()
}

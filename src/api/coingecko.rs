use crate::config::Settings;
use crate::error::PriceError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// Anything that can quote USD prices for a batch of identifiers.
///
/// Identifiers the source does not know are left out of the returned map.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, PriceError>;
}

pub struct CoingeckoApi {
    client: Client,
    base_url: String,
}

impl CoingeckoApi {
    pub fn new(settings: &Settings) -> Result<Self, PriceError> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(PriceError::Client)?;

        Ok(Self {
            client,
            base_url: settings.coingecko_base_url.clone(),
        })
    }
}

#[async_trait]
impl PriceSource for CoingeckoApi {
    async fn simple_prices(&self, ids: &[String]) -> Result<HashMap<String, f64>, PriceError> {
        let url = format!("{}/simple/price", self.base_url);
        let ids_param = ids.join(",");

        debug!("Sending request to {} for {} ids", url, ids.len());
        let response = self
            .client
            .get(&url)
            .query(&[("ids", ids_param.as_str()), ("vs_currencies", "usd")])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PriceError::RateLimited);
        }
        if !status.is_success() {
            return Err(PriceError::Status(status));
        }

        let body = response.bytes().await?;
        let json: HashMap<String, Value> = serde_json::from_slice(&body)?;
        Ok(parse_usd_prices(json))
    }
}

/// Keeps only identifiers carrying a usable `usd` price.
fn parse_usd_prices(json: HashMap<String, Value>) -> HashMap<String, f64> {
    json.into_iter()
        .filter_map(|(id, quote)| {
            let price = quote.get("usd").and_then(|p| p.as_f64())?;
            if price.is_finite() && price >= 0.0 {
                Some((id, price))
            } else {
                debug!("Ignoring unusable price for {}: {}", id, price);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_usd_prices_and_skips_junk() {
        let body = json!({
            "bitcoin": { "usd": 50000 },
            "ethereum": { "usd": 3000.5 },
            "no-usd": { "eur": 10.0 },
            "text-price": { "usd": "12" },
            "negative": { "usd": -1.0 },
            "not-an-object": 5
        });
        let json: HashMap<String, Value> = serde_json::from_value(body).unwrap();

        let prices = parse_usd_prices(json);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["bitcoin"], 50_000.0);
        assert_eq!(prices["ethereum"], 3_000.5);
    }
}

use crate::api::coingecko::{CoingeckoApi, PriceSource};
use crate::config::Settings;
use crate::error::PriceError;
use crate::models::cache::PriceCache;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// Turns identifier sets into USD prices, serving from a shared cache while
/// it is fresh and falling back to last-known prices when upstream fails.
///
/// Build one per process and share it behind an `Arc`. Concurrent cold-cache
/// callers are not coalesced: each may issue its own upstream request.
pub struct PriceService {
    source: Arc<dyn PriceSource>,
    cache: RwLock<PriceCache>,
    ttl: Duration,
    request_timeout: Duration,
}

impl PriceService {
    pub fn new(settings: &Settings) -> Result<Self, PriceError> {
        let api = CoingeckoApi::new(settings)?;
        Ok(Self::with_source(Arc::new(api), settings))
    }

    pub fn with_source(source: Arc<dyn PriceSource>, settings: &Settings) -> Self {
        Self {
            source,
            cache: RwLock::new(PriceCache::new()),
            ttl: settings.cache_ttl,
            request_timeout: settings.request_timeout,
        }
    }

    /// Returns a price for every normalized identifier in `ids`.
    ///
    /// Never fails: identifiers without any known price map to 0.0.
    pub async fn get_prices<I, S>(&self, ids: I) -> HashMap<String, f64>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ids = normalize_ids(ids);
        if ids.is_empty() {
            return HashMap::new();
        }

        {
            let cache = self.cache.read().await;
            if cache.is_fresh(self.ttl) && cache.contains_all(&ids) {
                debug!("Cache hit for {} ids", ids.len());
                return cache.lookup(&ids);
            }
        }

        debug!("Cache miss, requesting {} ids upstream", ids.len());
        let request: Vec<String> = ids.iter().cloned().collect();
        match self.fetch(&request).await {
            Ok(quotes) => {
                let missing = ids.iter().filter(|id| !quotes.contains_key(*id)).count();
                if missing > 0 {
                    debug!("Upstream had no usd price for {} of {} ids", missing, ids.len());
                }

                let mut cache = self.cache.write().await;
                let prices = cache.merge(&ids, &quotes, Instant::now());
                info!("Refreshed {} prices ({} cached)", quotes.len(), cache.len());
                prices
            }
            Err(e) => {
                if e.is_rate_limited() {
                    warn!("Rate limit hit, using cached prices for {} ids", ids.len());
                } else {
                    error!("Error fetching prices: {}", e);
                }
                self.cache.read().await.lookup(&ids)
            }
        }
    }

    async fn fetch(&self, ids: &[String]) -> Result<HashMap<String, f64>, PriceError> {
        tokio::time::timeout(self.request_timeout, self.source.simple_prices(ids))
            .await
            .map_err(|_| PriceError::Timeout(self.request_timeout))?
    }

    pub async fn last_refresh(&self) -> Option<Instant> {
        self.cache.read().await.refreshed_at()
    }

    pub async fn cached_price(&self, id: &str) -> Option<f64> {
        self.cache.read().await.price(id)
    }

    pub async fn cached_len(&self) -> usize {
        self.cache.read().await.len()
    }
}

/// Trims, lowercases and deduplicates identifiers.
pub fn normalize_ids<I, S>(ids: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    ids.into_iter()
        .map(|id| id.as_ref().trim().to_lowercase())
        .collect()
}

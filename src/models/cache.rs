use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::time::Instant;

/// Last-known USD prices plus the time of the last successful refresh.
///
/// Freshness is tracked for the cache as a whole, not per entry, and entries
/// are never evicted. Readers and writers go through the owning service's
/// lock so the map and the timestamp always change together.
#[derive(Debug, Default)]
pub struct PriceCache {
    entries: HashMap<String, f64>,
    refreshed_at: Option<Instant>,
}

impl PriceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_fresh(&self, ttl: Duration) -> bool {
        !self.entries.is_empty()
            && self
                .refreshed_at
                .map_or(false, |at| at.elapsed() < ttl)
    }

    pub fn contains_all(&self, ids: &BTreeSet<String>) -> bool {
        ids.iter().all(|id| self.entries.contains_key(id))
    }

    /// Cached prices for exactly `ids`, 0.0 for anything never cached.
    pub fn lookup(&self, ids: &BTreeSet<String>) -> HashMap<String, f64> {
        ids.iter()
            .map(|id| (id.clone(), self.price(id).unwrap_or(0.0)))
            .collect()
    }

    /// Applies a successful upstream batch.
    ///
    /// Quoted identifiers overwrite their entry; the rest keep their last
    /// known price. The refresh timestamp advances even when the batch was
    /// partial.
    pub fn merge(
        &mut self,
        ids: &BTreeSet<String>,
        quotes: &HashMap<String, f64>,
        now: Instant,
    ) -> HashMap<String, f64> {
        let mut prices = HashMap::with_capacity(ids.len());
        for id in ids {
            let price = match quotes.get(id) {
                Some(&price) => {
                    self.entries.insert(id.clone(), price);
                    price
                }
                None => self.price(id).unwrap_or(0.0),
            };
            prices.insert(id.clone(), price);
        }
        self.refreshed_at = Some(now);
        prices
    }

    pub fn price(&self, id: &str) -> Option<f64> {
        self.entries.get(id).copied()
    }

    pub fn refreshed_at(&self) -> Option<Instant> {
        self.refreshed_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

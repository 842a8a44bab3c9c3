use crate::models::holding::Holding;
use crate::services::price_service::PriceService;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct AssetValuation {
    pub holding: Holding,
    pub current_price: f64,
    pub total_value: f64,
    pub invested_value: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssetAllocation {
    pub symbol: String,
    pub ticker: String,
    pub value: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardStats {
    pub total_portfolio_value: f64,
    pub total_invested: f64,
    pub total_profit_loss: f64,
    pub total_profit_loss_percent: f64,
    pub asset_count: usize,
    pub allocations: Vec<AssetAllocation>,
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        part / whole * 100.0
    } else {
        0.0
    }
}

pub fn value_holdings(holdings: &[Holding], prices: &HashMap<String, f64>) -> Vec<AssetValuation> {
    holdings
        .iter()
        .map(|holding| {
            let current_price = prices.get(&holding.symbol).copied().unwrap_or(0.0);
            let total_value = current_price * holding.quantity;
            let invested_value = holding.buy_price * holding.quantity;
            let profit_loss = total_value - invested_value;

            AssetValuation {
                holding: holding.clone(),
                current_price,
                total_value,
                invested_value,
                profit_loss,
                profit_loss_percent: percent(profit_loss, invested_value),
            }
        })
        .collect()
}

pub fn dashboard_stats(holdings: &[Holding], prices: &HashMap<String, f64>) -> DashboardStats {
    if holdings.is_empty() {
        return DashboardStats::default();
    }

    let mut total_value = 0.0;
    let mut total_invested = 0.0;
    // Several holdings of the same asset collapse into one allocation.
    let mut by_asset: HashMap<(String, String), f64> = HashMap::new();

    for valuation in value_holdings(holdings, prices) {
        total_value += valuation.total_value;
        total_invested += valuation.invested_value;
        *by_asset
            .entry((valuation.holding.symbol, valuation.holding.ticker))
            .or_insert(0.0) += valuation.total_value;
    }

    let mut allocations: Vec<AssetAllocation> = by_asset
        .into_iter()
        .map(|((symbol, ticker), value)| AssetAllocation {
            symbol,
            ticker,
            value,
            percentage: percent(value, total_value),
        })
        .collect();
    allocations.sort_by(|a, b| {
        b.value
            .partial_cmp(&a.value)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });

    let total_profit_loss = total_value - total_invested;
    DashboardStats {
        total_portfolio_value: total_value,
        total_invested,
        total_profit_loss,
        total_profit_loss_percent: percent(total_profit_loss, total_invested),
        asset_count: holdings.len(),
        allocations,
    }
}

/// Values holdings against prices from the shared coordinator.
pub struct PortfolioService {
    prices: Arc<PriceService>,
}

impl PortfolioService {
    pub fn new(prices: Arc<PriceService>) -> Self {
        Self { prices }
    }

    async fn prices_for(&self, holdings: &[Holding]) -> HashMap<String, f64> {
        if holdings.is_empty() {
            return HashMap::new();
        }
        debug!("Pricing {} holdings", holdings.len());
        self.prices
            .get_prices(holdings.iter().map(|h| h.symbol.as_str()))
            .await
    }

    /// Per-asset rows and the summary, priced by a single lookup.
    pub async fn report(&self, holdings: &[Holding]) -> (Vec<AssetValuation>, DashboardStats) {
        let prices = self.prices_for(holdings).await;
        (
            value_holdings(holdings, &prices),
            dashboard_stats(holdings, &prices),
        )
    }
}

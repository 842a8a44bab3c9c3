use crate::services::portfolio::{AssetValuation, DashboardStats};
use colored::Colorize;
use prettytable::{format, Cell, Row, Table};
use std::collections::HashMap;

pub struct DisplayFormatter;

impl Default for DisplayFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn format_header(&self, text: &str) -> String {
        format!("\n=== {} ===", text.bright_white().bold())
    }

    pub fn format_table(&self, headers: &[&str], rows: &[Vec<String>]) -> String {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.add_row(Row::new(
            headers.iter().map(|h| Cell::new(h).style_spec("b")).collect(),
        ));
        for row in rows {
            table.add_row(Row::new(row.iter().map(|cell| Cell::new(cell)).collect()));
        }
        table.to_string()
    }

    pub fn format_currency(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        let abs = amount.abs();
        if abs >= 1.0 || abs == 0.0 {
            format!("{}${:.2}", sign, abs)
        } else {
            format!("{}${:.6}", sign, abs)
        }
    }

    pub fn format_colored_change(&self, change: f64) -> String {
        if change >= 0.0 {
            format!("+{:.2}%", change).green().to_string()
        } else {
            format!("{:.2}%", change).red().to_string()
        }
    }

    /// Prices sorted by identifier; 0.0 is shown as unavailable.
    pub fn format_prices(&self, prices: &HashMap<String, f64>) -> String {
        let mut ids: Vec<&String> = prices.keys().collect();
        ids.sort();
        let rows: Vec<Vec<String>> = ids
            .into_iter()
            .map(|id| {
                let price = prices[id];
                let shown = if price > 0.0 {
                    self.format_currency(price)
                } else {
                    "n/a".dimmed().to_string()
                };
                vec![id.clone(), shown]
            })
            .collect();
        self.format_table(&["Asset", "Price (USD)"], &rows)
    }

    pub fn format_valuations(&self, valuations: &[AssetValuation]) -> String {
        let rows: Vec<Vec<String>> = valuations
            .iter()
            .map(|v| {
                vec![
                    v.holding.ticker.clone(),
                    format!("{}", v.holding.quantity),
                    self.format_currency(v.holding.buy_price),
                    self.format_currency(v.current_price),
                    self.format_currency(v.total_value),
                    self.format_currency(v.profit_loss),
                    self.format_colored_change(v.profit_loss_percent),
                ]
            })
            .collect();
        self.format_table(
            &["Ticker", "Quantity", "Bought", "Price", "Value", "P/L", "P/L %"],
            &rows,
        )
    }

    pub fn format_dashboard(&self, stats: &DashboardStats) -> String {
        let mut output = vec![
            self.format_header("Portfolio"),
            format!("Assets: {}", stats.asset_count),
            format!("Value: {}", self.format_currency(stats.total_portfolio_value)),
            format!("Invested: {}", self.format_currency(stats.total_invested)),
            format!(
                "P/L: {} ({})",
                self.format_currency(stats.total_profit_loss),
                self.format_colored_change(stats.total_profit_loss_percent)
            ),
        ];

        if !stats.allocations.is_empty() {
            let rows: Vec<Vec<String>> = stats
                .allocations
                .iter()
                .map(|a| {
                    vec![
                        a.ticker.clone(),
                        a.symbol.clone(),
                        self.format_currency(a.value),
                        format!("{:.2}%", a.percentage),
                    ]
                })
                .collect();
            output.push(String::new());
            output.push(self.format_table(&["Ticker", "Asset", "Value", "Share"], &rows));
        }

        output.join("\n")
    }
}

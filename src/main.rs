use price_cache::models::holding::load_holdings;
use price_cache::utils::display::DisplayFormatter;
use price_cache::{PortfolioService, PriceService, Settings};
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error, info};

fn print_help() {
    println!("Commands:");
    println!("  price <id> [id...] - Show USD prices (e.g. price bitcoin ethereum)");
    println!("  portfolio          - Value the holdings file");
    println!("  help               - Show this help");
    println!("  exit               - Exit the program");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let settings = Settings::from_env()?;
    info!(
        "Starting price cache (upstream {}, ttl {:?}, timeout {:?})",
        settings.coingecko_base_url, settings.cache_ttl, settings.request_timeout
    );

    let prices = Arc::new(PriceService::new(&settings)?);
    let portfolio = PortfolioService::new(Arc::clone(&prices));
    let display = DisplayFormatter::new();

    println!("=== Cryptocurrency Portfolio Prices ===");
    print_help();

    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            debug!("Reached end of input");
            break;
        }

        let mut words = input.split_whitespace();
        match words.next() {
            None => continue,
            Some("exit") => {
                debug!("Received exit command");
                break;
            }
            Some("help") => print_help(),
            Some("price") => {
                let ids: Vec<&str> = words.collect();
                if ids.is_empty() {
                    println!("Usage: price <id> [id...]");
                    continue;
                }
                let quotes = prices.get_prices(ids).await;
                println!("{}", display.format_prices(&quotes));
            }
            Some("portfolio") => match load_holdings(&settings.holdings_file) {
                Ok(holdings) => {
                    let (valuations, stats) = portfolio.report(&holdings).await;
                    println!("{}", display.format_valuations(&valuations));
                    println!("{}", display.format_dashboard(&stats));
                }
                Err(e) => error!(
                    "Failed to load holdings from {}: {}",
                    settings.holdings_file.display(),
                    e
                ),
            },
            Some(other) => println!("Unknown command: {} (try 'help')", other),
        }
    }

    info!("Shutting down");
    Ok(())
}

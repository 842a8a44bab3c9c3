pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used items
pub use api::coingecko::{CoingeckoApi, PriceSource};
pub use config::Settings;
pub use error::PriceError;
pub use services::portfolio::PortfolioService;
pub use services::price_service::PriceService;

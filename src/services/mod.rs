pub mod portfolio;
pub mod price_service;

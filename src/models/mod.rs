pub mod cache;
pub mod holding;

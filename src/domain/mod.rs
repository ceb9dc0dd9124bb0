//! Core domain types and logic.

pub mod ohlcv;
pub mod price_series;
pub mod indicator;
pub mod parameters;
pub mod signal;
pub mod portfolio;
pub mod metrics;
pub mod objective;
pub mod optimizer;
pub mod config_validation;
pub mod error;

//! Moving-average crossover signal generation.
//!
//! A signal fires only on the bar where the raw indicator changes. The
//! comparison is against the previous *raw* indicator, never against the
//! previously emitted signal: a raw run of +1, +1, +1 yields Buy, Hold, Hold.

use std::fmt;

use super::indicator::sma::calculate_sma;
use super::indicator::{IndicatorValue, crossover_indicator};
use super::parameters::ParameterPair;
use super::price_series::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl Signal {
    fn from_direction(direction: i8) -> Self {
        match direction {
            d if d > 0 => Signal::Buy,
            d if d < 0 => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    /// +1, 0 or -1.
    pub fn value(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Hold => 0,
            Signal::Sell => -1,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

/// Raw crossover indicator for every bar of `series`.
pub fn raw_indicator(series: &PriceSeries, pair: ParameterPair) -> Vec<IndicatorValue> {
    let closes: Vec<f64> = series.closes().collect();
    let short = calculate_sma(&closes, pair.short());
    let long = calculate_sma(&closes, pair.long());
    crossover_indicator(&short, &long)
}

/// Emits `raw[i]` where it differs from `raw[i-1]` (with `raw[-1] = 0`), Hold elsewhere.
pub fn edge_detect(raw: &[IndicatorValue]) -> Vec<Signal> {
    let mut previous = 0i8;
    raw.iter()
        .map(|value| {
            let current = value.direction();
            let signal = if current != previous {
                Signal::from_direction(current)
            } else {
                Signal::Hold
            };
            previous = current;
            signal
        })
        .collect()
}

/// One signal per bar, same order as `series`.
pub fn generate_signals(series: &PriceSeries, pair: ParameterPair) -> Vec<Signal> {
    edge_detect(&raw_indicator(series, pair))
}

//! Rolling-average indicators.
//!
//! - `sma`: trailing simple moving average, `None` during warmup
//! - `IndicatorValue`: per-bar comparison of a short and a long average
//!
//! Undefined averages are carried as `Option<f64>` rather than NaN, so a
//! missing value can never compare greater or less than anything.

pub mod sma;

use std::fmt;

/// Outcome of comparing the short average against the long average on one bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorValue {
    /// Either average lacks enough history.
    Undefined,
    /// Short average above long average.
    Positive,
    /// Short average below long average.
    Negative,
    /// Both defined and equal.
    Zero,
}

impl IndicatorValue {
    pub fn compare(short: Option<f64>, long: Option<f64>) -> Self {
        match (short, long) {
            (Some(s), Some(l)) if s > l => IndicatorValue::Positive,
            (Some(s), Some(l)) if s < l => IndicatorValue::Negative,
            (Some(_), Some(_)) => IndicatorValue::Zero,
            _ => IndicatorValue::Undefined,
        }
    }

    /// Numeric raw indicator: +1, -1, or 0 (undefined counts as 0).
    pub fn direction(self) -> i8 {
        match self {
            IndicatorValue::Positive => 1,
            IndicatorValue::Negative => -1,
            IndicatorValue::Zero | IndicatorValue::Undefined => 0,
        }
    }
}

impl fmt::Display for IndicatorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorValue::Undefined => write!(f, "undefined"),
            IndicatorValue::Positive => write!(f, "+1"),
            IndicatorValue::Negative => write!(f, "-1"),
            IndicatorValue::Zero => write!(f, "0"),
        }
    }
}

/// Per-bar comparison of two equally long average series.
pub fn crossover_indicator(short: &[Option<f64>], long: &[Option<f64>]) -> Vec<IndicatorValue> {
    short
        .iter()
        .zip(long)
        .map(|(&s, &l)| IndicatorValue::compare(s, l))
        .collect()
}

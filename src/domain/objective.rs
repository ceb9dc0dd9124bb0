//! Scalar objective over the (short, long) lattice.

use super::error::SmaCrossError;
use super::parameters::ParameterPair;
use super::portfolio::terminal_value;
use super::price_series::PriceSeries;
use super::signal::generate_signals;

/// Black-box score to maximize. Evaluations must be independent of one
/// another, so candidates may be scored from several threads.
pub trait Objective: Sync {
    fn evaluate(&self, pair: ParameterPair) -> f64;
}

impl<F> Objective for F
where
    F: Fn(ParameterPair) -> f64 + Sync,
{
    fn evaluate(&self, pair: ParameterPair) -> f64 {
        self(pair)
    }
}

/// Terminal value of the crossover strategy on a fixed price series.
///
/// Every call regenerates signals and replays the portfolio from fresh
/// state.
#[derive(Debug, Clone, Copy)]
pub struct CrossoverObjective<'a> {
    series: &'a PriceSeries,
    initial_cash: f64,
}

impl<'a> CrossoverObjective<'a> {
    pub fn new(series: &'a PriceSeries, initial_cash: f64) -> Result<Self, SmaCrossError> {
        if !(initial_cash > 0.0) || !initial_cash.is_finite() {
            return Err(SmaCrossError::InvalidArgument {
                name: "initial_cash",
                reason: format!("{initial_cash} is not a positive amount"),
            });
        }
        Ok(Self {
            series,
            initial_cash,
        })
    }

    pub fn series(&self) -> &PriceSeries {
        self.series
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }
}

impl Objective for CrossoverObjective<'_> {
    fn evaluate(&self, pair: ParameterPair) -> f64 {
        let signals = generate_signals(self.series, pair);
        terminal_value(self.series, &signals, self.initial_cash)
    }
}

//! Portfolio simulation: signals in, terminal value out.
//!
//! Whole shares only, no costs, no shorting. Each simulation starts from a
//! fresh [`PortfolioState`] and nothing survives the call.

use chrono::NaiveDate;

use super::price_series::PriceSeries;
use super::signal::Signal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioState {
    pub cash: f64,
    pub shares: u64,
}

impl PortfolioState {
    pub fn new(initial_cash: f64) -> Self {
        PortfolioState {
            cash: initial_cash,
            shares: 0,
        }
    }

    /// Spends as much cash as possible on whole shares. Returns the quantity bought.
    pub fn buy_all(&mut self, price: f64) -> u64 {
        let mut quantity = (self.cash / price).floor();
        // cash / price can round up onto the next integer
        if quantity * price > self.cash {
            quantity -= 1.0;
        }
        if quantity < 1.0 {
            return 0;
        }
        self.shares += quantity as u64;
        self.cash -= quantity * price;
        quantity as u64
    }

    /// Liquidates the whole position. Returns the quantity sold.
    pub fn sell_all(&mut self, price: f64) -> u64 {
        let quantity = self.shares;
        if quantity > 0 {
            self.cash += quantity as f64 * price;
            self.shares = 0;
        }
        quantity
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.cash + self.shares as f64 * price
    }

    fn apply(&mut self, signal: Signal, price: f64) -> Option<(Side, u64)> {
        match signal {
            Signal::Buy => match self.buy_all(price) {
                0 => None,
                quantity => Some((Side::Buy, quantity)),
            },
            Signal::Sell => match self.sell_all(price) {
                0 => None,
                quantity => Some((Side::Sell, quantity)),
            },
            Signal::Hold => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub bar: usize,
    pub date: NaiveDate,
    pub side: Side,
    pub quantity: u64,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub cash: f64,
    pub shares: u64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub initial_cash: f64,
    pub terminal_value: f64,
    pub fills: Vec<Fill>,
    pub equity_curve: Vec<EquityPoint>,
}

/// Terminal portfolio value after trading `signals` bar by bar over `series`.
///
/// Signals beyond the end of the series are ignored; bars without a signal
/// are treated as Hold.
pub fn terminal_value(series: &PriceSeries, signals: &[Signal], initial_cash: f64) -> f64 {
    let mut state = PortfolioState::new(initial_cash);
    for (bar, &signal) in series.bars().iter().zip(signals) {
        state.apply(signal, bar.close);
    }
    state.market_value(series.last_close())
}

/// Like [`terminal_value`], also recording every fill and the per-bar equity.
pub fn simulate(series: &PriceSeries, signals: &[Signal], initial_cash: f64) -> SimulationResult {
    let mut state = PortfolioState::new(initial_cash);
    let mut fills = Vec::new();
    let mut equity_curve = Vec::with_capacity(series.len());

    for (i, bar) in series.bars().iter().enumerate() {
        let signal = signals.get(i).copied().unwrap_or(Signal::Hold);
        if let Some((side, quantity)) = state.apply(signal, bar.close) {
            fills.push(Fill {
                bar: i,
                date: bar.date,
                side,
                quantity,
                price: bar.close,
            });
        }
        equity_curve.push(EquityPoint {
            date: bar.date,
            cash: state.cash,
            shares: state.shares,
            equity: state.market_value(bar.close),
        });
    }

    SimulationResult {
        initial_cash,
        terminal_value: state.market_value(series.last_close()),
        fills,
        equity_curve,
    }
}

/// Buy as many whole shares as possible at the first close and hold to the end.
pub fn buy_and_hold_value(series: &PriceSeries, initial_cash: f64) -> f64 {
    let mut state = PortfolioState::new(initial_cash);
    state.buy_all(series.first_close());
    state.market_value(series.last_close())
}

//! Performance summary of one simulation against the buy-and-hold baseline.

use super::portfolio::{EquityPoint, Side, SimulationResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub terminal_value: f64,
    pub buy_and_hold_value: f64,
    pub total_return: f64,
    pub buy_and_hold_return: f64,
    pub excess_return: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: usize,
    pub buys: usize,
    pub sells: usize,
}

impl Metrics {
    pub fn compute(result: &SimulationResult, buy_and_hold_value: f64) -> Self {
        let total_return = relative_return(result.terminal_value, result.initial_cash);
        let buy_and_hold_return = relative_return(buy_and_hold_value, result.initial_cash);
        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&result.equity_curve);

        let buys = result.fills.iter().filter(|f| f.side == Side::Buy).count();
        let sells = result.fills.len() - buys;

        Metrics {
            terminal_value: result.terminal_value,
            buy_and_hold_value,
            total_return,
            buy_and_hold_return,
            excess_return: total_return - buy_and_hold_return,
            max_drawdown,
            max_drawdown_duration,
            buys,
            sells,
        }
    }
}

fn relative_return(value: f64, initial: f64) -> f64 {
    if initial > 0.0 {
        (value - initial) / initial
    } else {
        0.0
    }
}

/// Largest peak-to-trough fall as a fraction of the peak, and the longest
/// run of bars spent below a prior peak.
fn compute_drawdown(equity_curve: &[EquityPoint]) -> (f64, usize) {
    if equity_curve.is_empty() {
        return (0.0, 0);
    }

    let mut peak = equity_curve[0].equity;
    let mut max_dd = 0.0_f64;
    let mut max_dd_duration = 0usize;
    let mut current_dd_duration = 0usize;

    for point in equity_curve {
        if point.equity >= peak {
            peak = point.equity;
            current_dd_duration = 0;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
            current_dd_duration += 1;
            if current_dd_duration > max_dd_duration {
                max_dd_duration = current_dd_duration;
            }
        }
    }

    (max_dd, max_dd_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::portfolio::Fill;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn point(day: u32, equity: f64) -> EquityPoint {
        EquityPoint {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            cash: equity,
            shares: 0,
            equity,
        }
    }

    fn fill(bar: usize, side: Side) -> Fill {
        Fill {
            bar,
            date: NaiveDate::from_ymd_opt(2024, 1, bar as u32 + 1).unwrap(),
            side,
            quantity: 1,
            price: 100.0,
        }
    }

    fn result(curve: Vec<EquityPoint>, fills: Vec<Fill>) -> SimulationResult {
        let terminal_value = curve.last().map(|p| p.equity).unwrap_or(1000.0);
        SimulationResult {
            initial_cash: 1000.0,
            terminal_value,
            fills,
            equity_curve: curve,
        }
    }

    #[test]
    fn returns_relative_to_initial_cash() {
        let r = result(vec![point(1, 1000.0), point(2, 1200.0)], vec![]);
        let m = Metrics::compute(&r, 1100.0);

        assert_relative_eq!(m.total_return, 0.2);
        assert_relative_eq!(m.buy_and_hold_return, 0.1);
        assert_relative_eq!(m.excess_return, 0.1, epsilon = 1e-12);
        assert_relative_eq!(m.terminal_value, 1200.0);
        assert_relative_eq!(m.buy_and_hold_value, 1100.0);
    }

    #[test]
    fn drawdown_peak_to_trough() {
        let curve = vec![
            point(1, 1000.0),
            point(2, 1200.0),
            point(3, 900.0),
            point(4, 1000.0),
            point(5, 1300.0),
        ];
        let m = Metrics::compute(&result(curve, vec![]), 1000.0);

        assert_relative_eq!(m.max_drawdown, 0.25);
        assert_eq!(m.max_drawdown_duration, 2);
    }

    #[test]
    fn flat_curve_has_no_drawdown() {
        let curve = vec![point(1, 1000.0), point(2, 1000.0), point(3, 1000.0)];
        let m = Metrics::compute(&result(curve, vec![]), 1000.0);

        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.max_drawdown_duration, 0);
    }

    #[test]
    fn counts_fills_by_side() {
        let fills = vec![
            fill(0, Side::Buy),
            fill(2, Side::Sell),
            fill(3, Side::Buy),
        ];
        let m = Metrics::compute(&result(vec![point(1, 1000.0)], fills), 1000.0);

        assert_eq!(m.buys, 2);
        assert_eq!(m.sells, 1);
    }

    #[test]
    fn empty_curve() {
        let m = Metrics::compute(&result(vec![], vec![]), 1000.0);
        assert_eq!(m.max_drawdown, 0.0);
        assert_eq!(m.total_return, 0.0);
    }
}

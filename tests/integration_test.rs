//! Integration tests.
//!
//! Tests cover:
//! - Signal generation and simulation on a steadily rising market
//! - CSV adapter feeding the objective, matching an in-memory series
//! - Both optimizers driven through the data port
//! - Expanding-radius search against fixed-step search on a plateau

mod common;

use approx::assert_relative_eq;
use common::*;
use smacross::adapters::csv_adapter::CsvAdapter;
use smacross::domain::error::SmaCrossError;
use smacross::domain::metrics::Metrics;
use smacross::domain::objective::{CrossoverObjective, Objective};
use smacross::domain::optimizer::{
    ExpandingRadiusConfig, ExpandingRadiusOptimizer, FixedStepConfig, FixedStepOptimizer,
    StopReason,
};
use smacross::domain::parameters::ParameterPair;
use smacross::domain::portfolio::{Side, buy_and_hold_value, simulate, terminal_value};
use smacross::domain::signal::{Signal, generate_signals};
use smacross::ports::data_port::DataPort;

fn pair(short: i64, long: i64) -> ParameterPair {
    ParameterPair::new(short, long).unwrap()
}

mod rising_market {
    use super::*;

    #[test]
    fn single_buy_at_first_crossover_and_no_sell() {
        let s = series(&linear_closes(300, 100.0, 400.0));
        let signals = generate_signals(&s, pair(10, 50));

        assert_eq!(signals.len(), 300);
        let buys: Vec<usize> = signals
            .iter()
            .enumerate()
            .filter(|(_, sig)| **sig == Signal::Buy)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(buys, vec![49]);
        assert!(!signals.contains(&Signal::Sell));
    }

    #[test]
    fn simulation_fills_once_and_grows() {
        let closes = linear_closes(300, 100.0, 400.0);
        let s = series(&closes);
        let signals = generate_signals(&s, pair(10, 50));
        let result = simulate(&s, &signals, 1_000_000.0);

        assert_eq!(result.fills.len(), 1);
        let fill = &result.fills[0];
        assert_eq!(fill.bar, 49);
        assert_eq!(fill.side, Side::Buy);
        assert_relative_eq!(fill.price, closes[49]);
        assert_eq!(fill.quantity, (1_000_000.0 / closes[49]).floor() as u64);

        assert!(result.terminal_value > 1_000_000.0);
        assert_relative_eq!(result.terminal_value, terminal_value(&s, &signals, 1_000_000.0));

        // Buying late in a straight-line rally can't beat buying at the start.
        let bh = buy_and_hold_value(&s, 1_000_000.0);
        let metrics = Metrics::compute(&result, bh);
        assert!(metrics.excess_return < 0.0);
        assert_eq!(metrics.buys, 1);
        assert_eq!(metrics.sells, 0);
        assert!(metrics.max_drawdown < 1e-9);
    }

    #[test]
    fn windows_longer_than_series_hold_cash() {
        let s = series(&linear_closes(30, 100.0, 130.0));
        let signals = generate_signals(&s, pair(10, 50));

        assert!(signals.iter().all(|sig| *sig == Signal::Hold));
        assert_eq!(terminal_value(&s, &signals, 5_000.0), 5_000.0);
    }
}

mod csv_pipeline {
    use super::*;

    #[test]
    fn csv_series_scores_like_in_memory_series() {
        let closes = wave_closes(250);
        let file = write_temp_file(".csv", &closes_to_csv(&closes));

        let from_csv = CsvAdapter::new(file.path().to_path_buf())
            .fetch_series(None, None)
            .unwrap();
        let in_memory = series(&closes);
        assert_eq!(from_csv.len(), in_memory.len());

        let csv_objective = CrossoverObjective::new(&from_csv, 100_000.0).unwrap();
        let memory_objective = CrossoverObjective::new(&in_memory, 100_000.0).unwrap();
        for p in [pair(3, 10), pair(5, 20), pair(10, 40), pair(20, 60)] {
            assert_eq!(csv_objective.evaluate(p), memory_objective.evaluate(p));
        }
    }

    #[test]
    fn csv_date_range_limits_series() {
        let closes = wave_closes(100);
        let file = write_temp_file(".csv", &closes_to_csv(&closes));
        let adapter = CsvAdapter::new(file.path().to_path_buf());

        let s = adapter
            .fetch_series(Some(date(2020, 1, 11)), Some(date(2020, 1, 20)))
            .unwrap();
        assert_eq!(s.len(), 10);
        assert_eq!(s.first_date(), date(2020, 1, 11));
        assert_eq!(s.last_date(), date(2020, 1, 20));

        let range = adapter.get_data_range().unwrap();
        assert_eq!(range, Some((date(2020, 1, 1), date(2020, 4, 9), 100)));
    }

    #[test]
    fn empty_range_is_rejected_by_series() {
        let file = write_temp_file(".csv", &closes_to_csv(&wave_closes(10)));
        let err = CsvAdapter::new(file.path().to_path_buf())
            .fetch_series(Some(date(2021, 1, 1)), None)
            .unwrap_err();
        assert!(matches!(err, SmaCrossError::EmptySeries));
    }
}

mod optimization_pipeline {
    use super::*;

    #[test]
    fn fixed_step_moves_stay_on_valid_pairs() {
        let port = MockDataPort::new().with_bars(make_bars(&wave_closes(400)));
        let s = port.fetch_series(None, None).unwrap();
        let objective = CrossoverObjective::new(&s, 100_000.0).unwrap();

        let result = FixedStepOptimizer::default().optimize(&objective, pair(5, 30));

        assert!(result.iterations() <= 100);
        assert_eq!(result.best_score, objective.evaluate(result.best));
        for m in &result.moves {
            assert!(m.pair.short() >= 1);
            assert!(m.pair.long() > m.pair.short());
        }
    }

    #[test]
    fn expanding_radius_improves_or_keeps_start_score() {
        let port = MockDataPort::new().with_bars(make_bars(&wave_closes(400)));
        let s = port.fetch_series(None, None).unwrap();
        let objective = CrossoverObjective::new(&s, 100_000.0).unwrap();

        let result = ExpandingRadiusOptimizer::new(ExpandingRadiusConfig {
            max_radius: 3,
            ..ExpandingRadiusConfig::default()
        })
        .optimize(&objective, pair(5, 30));

        assert!(result.best_score >= result.start_score);
        assert_eq!(result.stop_reason, StopReason::RadiusExhausted);
        assert_eq!(result.best_score, objective.evaluate(result.best));
    }

    #[test]
    fn parallel_search_matches_sequential_on_real_objective() {
        let s = series(&wave_closes(300));
        let objective = CrossoverObjective::new(&s, 100_000.0).unwrap();

        let sequential = FixedStepOptimizer::default().optimize(&objective, pair(4, 25));
        let parallel = FixedStepOptimizer::new(FixedStepConfig {
            parallel: true,
            ..FixedStepConfig::default()
        })
        .optimize(&objective, pair(4, 25));

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn data_port_error_propagates() {
        let port = MockDataPort::new().with_error("feed offline");
        let err = port.fetch_series(None, None).unwrap_err();
        assert!(err.to_string().contains("feed offline"));
    }

    #[test]
    fn mock_port_filters_dates() {
        let port = MockDataPort::new().with_bars(make_bars(&wave_closes(40)));
        let bars = port
            .fetch_ohlcv(Some(date(2020, 1, 5)), Some(date(2020, 1, 9)))
            .unwrap();
        assert_eq!(bars.len(), 5);
    }
}

mod plateau_search {
    use super::*;

    /// Flat except a ridge two short-steps away from (20, 60).
    fn plateau(p: ParameterPair) -> f64 {
        if p.short() == 22 && (58..=62).contains(&p.long()) {
            10.0
        } else {
            1.0
        }
    }

    #[test]
    fn expanding_radius_at_least_as_good_as_fixed_step() {
        let start = pair(20, 60);
        let fixed = FixedStepOptimizer::default().optimize(&plateau, start);
        let expanding = ExpandingRadiusOptimizer::default().optimize(&plateau, start);

        assert_eq!(fixed.best, start);
        assert_eq!(fixed.stop_reason, StopReason::LocalOptimum);
        assert!(expanding.best_score >= fixed.best_score);
        assert_eq!(expanding.best_score, 10.0);
        assert_eq!(expanding.best, pair(22, 58));
    }
}

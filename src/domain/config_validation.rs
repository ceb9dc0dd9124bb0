//! Configuration validation.
//!
//! Checks every `[data]`, `[backtest]` and `[optimizer]` key before a run
//! starts. Absent keys fall back to their defaults; present keys must hold
//! a usable value.

use crate::domain::error::SmaCrossError;
use crate::domain::optimizer::OptimizerMethod;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub const DEFAULT_INITIAL_CASH: f64 = 1_000_000.0;
pub const DEFAULT_SHORT_WINDOW: i64 = 50;
pub const DEFAULT_LONG_WINDOW: i64 = 200;
pub const DEFAULT_STEP: i64 = 1;
pub const DEFAULT_MAX_ITERATIONS: i64 = 100;
pub const DEFAULT_MAX_RADIUS: i64 = 5;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    validate_data_config(config)?;
    validate_backtest_config(config)?;
    validate_optimizer_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    if let Some(path) = config.get_string("data", "path") {
        if path.trim().is_empty() {
            return Err(invalid("data", "path", "path must not be empty"));
        }
    }
    validate_dates(config)
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    validate_initial_cash(config)?;
    validate_at_least_one(config, "backtest", "short_window", DEFAULT_SHORT_WINDOW)?;
    validate_at_least_one(config, "backtest", "long_window", DEFAULT_LONG_WINDOW)?;
    Ok(())
}

pub fn validate_optimizer_config(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    validate_method(config)?;
    validate_at_least_one(config, "optimizer", "step", DEFAULT_STEP)?;
    validate_at_least_one(config, "optimizer", "max_iterations", DEFAULT_MAX_ITERATIONS)?;
    validate_at_least_one(config, "optimizer", "max_radius", DEFAULT_MAX_RADIUS)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> SmaCrossError {
    SmaCrossError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    if let Some(raw) = config.get_string("backtest", "initial_cash") {
        match raw.trim().parse::<f64>() {
            Ok(v) if v > 0.0 && v.is_finite() => {}
            Ok(_) => {
                return Err(invalid(
                    "backtest",
                    "initial_cash",
                    "initial_cash must be positive",
                ));
            }
            Err(_) => {
                return Err(invalid(
                    "backtest",
                    "initial_cash",
                    format!("'{}' is not a number", raw),
                ));
            }
        }
    }
    Ok(())
}

/// Integer keys that must be at least 1. A present but non-numeric value
/// is rejected rather than silently replaced by the default.
fn validate_at_least_one(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<(), SmaCrossError> {
    if let Some(raw) = config.get_string(section, key) {
        if raw.trim().parse::<i64>().is_err() {
            return Err(invalid(section, key, format!("'{}' is not an integer", raw)));
        }
    }
    let value = config.get_int(section, key, default);
    if value < 1 {
        return Err(invalid(section, key, format!("{} must be at least 1", key)));
    }
    Ok(())
}

fn validate_method(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    if let Some(raw) = config.get_string("optimizer", "method") {
        raw.parse::<OptimizerMethod>()
            .map_err(|reason| invalid("optimizer", "method", reason))?;
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SmaCrossError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start_date, end_date) {
        if start >= end {
            return Err(invalid(
                "data",
                "start_date",
                "start_date must be before end_date",
            ));
        }
    }
    Ok(())
}

/// Optional `[data]` date; present values must be `YYYY-MM-DD`.
pub fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<Option<NaiveDate>, SmaCrossError> {
    match config.get_string("data", key) {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("data", key, format!("invalid {} format, expected YYYY-MM-DD", key))),
    }
}

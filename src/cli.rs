//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    self, DEFAULT_INITIAL_CASH, DEFAULT_LONG_WINDOW, DEFAULT_MAX_ITERATIONS, DEFAULT_MAX_RADIUS,
    DEFAULT_SHORT_WINDOW, DEFAULT_STEP, validate_config,
};
use crate::domain::error::SmaCrossError;
use crate::domain::metrics::Metrics;
use crate::domain::objective::CrossoverObjective;
use crate::domain::optimizer::{
    ExpandingRadiusConfig, ExpandingRadiusOptimizer, FixedStepConfig, FixedStepOptimizer,
    OptimizationResult, OptimizerMethod,
};
use crate::domain::parameters::ParameterPair;
use crate::domain::portfolio::{buy_and_hold_value, simulate};
use crate::domain::price_series::PriceSeries;
use crate::domain::signal::generate_signals;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "SMA crossover backtester and window optimizer")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest one (short, long) window pair
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Price CSV, overriding [data] path
        #[arg(short, long)]
        data: Option<PathBuf>,
        #[arg(long, allow_negative_numbers = true)]
        short: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        long: Option<i64>,
    },
    /// Search for the window pair with the best terminal value
    Optimize {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// hill_climb or expanding
        #[arg(short, long)]
        method: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        short: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        long: Option<i64>,
        /// Score neighbors in parallel
        #[arg(long)]
        parallel: bool,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show the date range of the price data
    Info {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        data: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSettings {
    pub path: PathBuf,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestSettings {
    pub initial_cash: f64,
    pub pair: ParameterPair,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    pub method: OptimizerMethod,
    pub fixed_step: FixedStepConfig,
    pub expanding: ExpandingRadiusConfig,
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data,
            short,
            long,
        } => run_backtest(&config, data.as_deref(), short, long),
        Command::Optimize {
            config,
            data,
            method,
            short,
            long,
            parallel,
        } => run_optimize(&config, data.as_deref(), method.as_deref(), short, long, parallel),
        Command::Validate { config } => run_validate(&config),
        Command::Info { config, data } => run_info(config.as_deref(), data.as_deref()),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|err| {
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: SmaCrossError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

/// Loads and validates the config, reporting any failure.
fn load_validated_config(config_path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = load_config(config_path)?;
    validate_config(&adapter).map_err(fail)?;
    Ok(adapter)
}

pub fn build_data_settings(
    adapter: &dyn ConfigPort,
    data_override: Option<&Path>,
) -> Result<DataSettings, SmaCrossError> {
    let path = match data_override {
        Some(p) => p.to_path_buf(),
        None => adapter
            .get_string("data", "path")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| SmaCrossError::ConfigMissing {
                section: "data".into(),
                key: "path".into(),
            })?,
    };

    Ok(DataSettings {
        path,
        start_date: config_validation::parse_date(adapter, "start_date")?,
        end_date: config_validation::parse_date(adapter, "end_date")?,
    })
}

pub fn build_backtest_settings(
    adapter: &dyn ConfigPort,
    short_override: Option<i64>,
    long_override: Option<i64>,
) -> Result<BacktestSettings, SmaCrossError> {
    let short =
        short_override.unwrap_or_else(|| adapter.get_int("backtest", "short_window", DEFAULT_SHORT_WINDOW));
    let long =
        long_override.unwrap_or_else(|| adapter.get_int("backtest", "long_window", DEFAULT_LONG_WINDOW));

    Ok(BacktestSettings {
        initial_cash: adapter.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH),
        pair: ParameterPair::new(short, long)?,
    })
}

pub fn build_optimizer_settings(
    adapter: &dyn ConfigPort,
    method_override: Option<&str>,
    parallel_override: bool,
) -> Result<OptimizerSettings, SmaCrossError> {
    let method = match method_override {
        Some(m) => m
            .parse::<OptimizerMethod>()
            .map_err(|reason| SmaCrossError::InvalidArgument {
                name: "method",
                reason,
            })?,
        None => match adapter.get_string("optimizer", "method") {
            Some(m) => m.parse::<OptimizerMethod>().map_err(|reason| {
                SmaCrossError::ConfigInvalid {
                    section: "optimizer".into(),
                    key: "method".into(),
                    reason,
                }
            })?,
            None => OptimizerMethod::HillClimb,
        },
    };
    let parallel = parallel_override || adapter.get_bool("optimizer", "parallel", false);

    Ok(OptimizerSettings {
        method,
        fixed_step: FixedStepConfig {
            step: positive_usize(adapter, "step", DEFAULT_STEP)?,
            max_iterations: positive_usize(adapter, "max_iterations", DEFAULT_MAX_ITERATIONS)?,
            parallel,
        },
        expanding: ExpandingRadiusConfig {
            max_radius: positive_usize(adapter, "max_radius", DEFAULT_MAX_RADIUS)?,
            max_moves: None,
            parallel,
        },
    })
}

fn positive_usize(adapter: &dyn ConfigPort, key: &str, default: i64) -> Result<usize, SmaCrossError> {
    let value = adapter.get_int("optimizer", key, default);
    usize::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| SmaCrossError::ConfigInvalid {
            section: "optimizer".into(),
            key: key.into(),
            reason: format!("{} must be at least 1", key),
        })
}

pub fn load_series(settings: &DataSettings) -> Result<PriceSeries, SmaCrossError> {
    eprintln!("Loading prices from {}", settings.path.display());
    let adapter = CsvAdapter::new(settings.path.clone());
    let series = adapter.fetch_series(settings.start_date, settings.end_date)?;
    eprintln!(
        "  {} bars, {} to {}",
        series.len(),
        series.first_date(),
        series.last_date()
    );
    Ok(series)
}

pub fn run_optimizer(
    settings: &OptimizerSettings,
    objective: &CrossoverObjective<'_>,
    start: ParameterPair,
) -> OptimizationResult {
    match settings.method {
        OptimizerMethod::HillClimb => {
            FixedStepOptimizer::new(settings.fixed_step).optimize(objective, start)
        }
        OptimizerMethod::Expanding => {
            ExpandingRadiusOptimizer::new(settings.expanding).optimize(objective, start)
        }
    }
}

fn run_backtest(
    config_path: &Path,
    data: Option<&Path>,
    short: Option<i64>,
    long: Option<i64>,
) -> ExitCode {
    let adapter = match load_validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let (data_settings, settings) = match build_data_settings(&adapter, data)
        .and_then(|d| Ok((d, build_backtest_settings(&adapter, short, long)?)))
    {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let series = match load_series(&data_settings) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    let signals = generate_signals(&series, settings.pair);
    let result = simulate(&series, &signals, settings.initial_cash);
    let metrics = Metrics::compute(&result, buy_and_hold_value(&series, settings.initial_cash));

    eprintln!("\n=== Backtest {} ===", settings.pair);
    eprintln!("Initial Cash:     {:.2}", settings.initial_cash);
    eprintln!("Terminal Value:   {:.2}", metrics.terminal_value);
    eprintln!("Buy and Hold:     {:.2}", metrics.buy_and_hold_value);
    eprintln!("Total Return:     {:.2}%", metrics.total_return * 100.0);
    eprintln!("B&H Return:       {:.2}%", metrics.buy_and_hold_return * 100.0);
    eprintln!("Excess Return:    {:.2}%", metrics.excess_return * 100.0);
    eprintln!("Max Drawdown:     -{:.1}%", metrics.max_drawdown * 100.0);
    eprintln!(
        "Fills:            {} ({} buys, {} sells)",
        result.fills.len(),
        metrics.buys,
        metrics.sells
    );

    println!("{:.2}", metrics.terminal_value);
    ExitCode::SUCCESS
}

fn run_optimize(
    config_path: &Path,
    data: Option<&Path>,
    method: Option<&str>,
    short: Option<i64>,
    long: Option<i64>,
    parallel: bool,
) -> ExitCode {
    let adapter = match load_validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };
    let settings = build_data_settings(&adapter, data).and_then(|d| {
        Ok((
            d,
            build_backtest_settings(&adapter, short, long)?,
            build_optimizer_settings(&adapter, method, parallel)?,
        ))
    });
    let (data_settings, backtest, optimizer) = match settings {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let series = match load_series(&data_settings) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let objective = match CrossoverObjective::new(&series, backtest.initial_cash) {
        Ok(o) => o,
        Err(e) => return fail(e),
    };

    eprintln!(
        "Optimizing with {} from {}{}",
        optimizer.method,
        backtest.pair,
        if optimizer.fixed_step.parallel { " (parallel)" } else { "" }
    );
    let result = run_optimizer(&optimizer, &objective, backtest.pair);

    eprintln!("\n=== Optimization Results ===");
    eprintln!("Start:            {} -> {:.2}", result.start, result.start_score);
    eprintln!("Best:             {} -> {:.2}", result.best, result.best_score);
    eprintln!("Buy and Hold:     {:.2}", buy_and_hold_value(&series, backtest.initial_cash));
    eprintln!("Moves:            {}", result.iterations());
    eprintln!("Evaluations:      {}", result.evaluations);
    eprintln!("Stopped:          {}", result.stop_reason);

    println!("{},{}", result.best.short(), result.best.long());
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    let adapter = match load_validated_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let backtest = match build_backtest_settings(&adapter, None, None) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };
    let optimizer = match build_optimizer_settings(&adapter, None, false) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    eprintln!("Config validated successfully");
    eprintln!("\nBacktest:");
    eprintln!("  initial_cash: {:.2}", backtest.initial_cash);
    eprintln!("  windows:      {}", backtest.pair);
    eprintln!("\nOptimizer:");
    eprintln!("  method:         {}", optimizer.method);
    eprintln!("  step:           {}", optimizer.fixed_step.step);
    eprintln!("  max_iterations: {}", optimizer.fixed_step.max_iterations);
    eprintln!("  max_radius:     {}", optimizer.expanding.max_radius);
    eprintln!("  parallel:       {}", optimizer.fixed_step.parallel);
    if backtest.pair.long() <= backtest.pair.short() {
        eprintln!("\nwarning: long_window is not above short_window");
    }
    ExitCode::SUCCESS
}

fn run_info(config_path: Option<&Path>, data: Option<&Path>) -> ExitCode {
    let path = match (data, config_path) {
        (Some(d), _) => d.to_path_buf(),
        (None, Some(c)) => {
            let adapter = match load_config(c) {
                Ok(a) => a,
                Err(code) => return code,
            };
            match build_data_settings(&adapter, None) {
                Ok(s) => s.path,
                Err(e) => return fail(e),
            }
        }
        (None, None) => {
            eprintln!("error: --config or --data is required for info");
            return ExitCode::from(1);
        }
    };

    match CsvAdapter::new(path.clone()).get_data_range() {
        Ok(Some((first, last, count))) => {
            println!("{}: {} bars, {} to {}", path.display(), count, first, last);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("{}: no data found", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}

//! Greedy local search over (short, long) window pairs.
//!
//! Both optimizers score a neighborhood of the current point, move to the
//! first strictly best candidate, and clamp the move back onto
//! `1 <= short < long`. Neither guarantees a global optimum.

pub mod expanding;
pub mod hill_climb;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;
use tracing::debug;

use super::objective::Objective;
use super::parameters::ParameterPair;

pub use expanding::{ExpandingRadiusConfig, ExpandingRadiusOptimizer, hollow_square};
pub use hill_climb::{FixedStepConfig, FixedStepOptimizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizerMethod {
    HillClimb,
    Expanding,
}

impl FromStr for OptimizerMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "hill_climb" | "fixed_step" => Ok(OptimizerMethod::HillClimb),
            "expanding" | "expanding_radius" => Ok(OptimizerMethod::Expanding),
            other => Err(format!(
                "unknown optimizer method '{other}' (expected hill_climb or expanding)"
            )),
        }
    }
}

impl fmt::Display for OptimizerMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptimizerMethod::HillClimb => write!(f, "hill_climb"),
            OptimizerMethod::Expanding => write!(f, "expanding"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// No neighbor strictly improved on the current score.
    LocalOptimum,
    /// The iteration (or move) budget ran out.
    IterationLimit,
    /// Every radius up to the maximum failed to improve.
    RadiusExhausted,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::LocalOptimum => write!(f, "local optimum"),
            StopReason::IterationLimit => write!(f, "iteration limit"),
            StopReason::RadiusExhausted => write!(f, "radius exhausted"),
        }
    }
}

/// One accepted move, after clamping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Move {
    pub pair: ParameterPair,
    pub score: f64,
    /// Neighborhood radius the move was found at (expanding search only).
    pub radius: Option<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    pub start: ParameterPair,
    pub start_score: f64,
    pub best: ParameterPair,
    pub best_score: f64,
    pub moves: Vec<Move>,
    pub evaluations: usize,
    pub stop_reason: StopReason,
}

impl OptimizationResult {
    /// Number of accepted moves.
    pub fn iterations(&self) -> usize {
        self.moves.len()
    }
}

/// Scores every candidate, in candidate order.
pub(crate) fn score_candidates(
    objective: &dyn Objective,
    candidates: &[ParameterPair],
    parallel: bool,
) -> Vec<f64> {
    if parallel {
        candidates
            .par_iter()
            .map(|&pair| objective.evaluate(pair))
            .collect()
    } else {
        candidates
            .iter()
            .map(|&pair| objective.evaluate(pair))
            .collect()
    }
}

/// First candidate whose score is strictly greater than `current_score` and
/// every earlier candidate's score.
pub(crate) fn select_improvement(
    candidates: &[ParameterPair],
    scores: &[f64],
    current_score: f64,
) -> Option<(ParameterPair, f64)> {
    let mut best = None;
    let mut best_score = current_score;
    for (&pair, &score) in candidates.iter().zip(scores) {
        debug!(%pair, score, "candidate");
        if score > best_score {
            best_score = score;
            best = Some((pair, score));
        }
    }
    best
}

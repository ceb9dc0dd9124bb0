//! Fixed-step hill climbing over the four axis neighbors.

use tracing::info;

use super::{Move, OptimizationResult, StopReason, score_candidates, select_improvement};
use crate::domain::objective::Objective;
use crate::domain::parameters::ParameterPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedStepConfig {
    pub step: usize,
    pub max_iterations: usize,
    /// Score the neighbors of one iteration on the rayon pool.
    pub parallel: bool,
}

impl Default for FixedStepConfig {
    fn default() -> Self {
        FixedStepConfig {
            step: 1,
            max_iterations: 100,
            parallel: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixedStepOptimizer {
    config: FixedStepConfig,
}

impl FixedStepOptimizer {
    pub fn new(config: FixedStepConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FixedStepConfig {
        &self.config
    }

    /// (short+step, long), (short-step, long), (short, long+step),
    /// (short, long-step). A window pushed to 0 or below stays a candidate
    /// with an undefined average; the move is clamped once chosen.
    pub fn neighbors(&self, pair: ParameterPair) -> Vec<ParameterPair> {
        let step = self.config.step as i64;
        [(step, 0), (-step, 0), (0, step), (0, -step)]
            .into_iter()
            .map(|(ds, dl)| pair.offset(ds, dl))
            .collect()
    }

    pub fn optimize(&self, objective: &dyn Objective, start: ParameterPair) -> OptimizationResult {
        let start_score = objective.evaluate(start);
        let mut evaluations = 1;
        info!(%start, score = start_score, "starting fixed-step optimization");

        let mut current = start;
        let mut current_score = start_score;
        let mut moves = Vec::new();
        let mut stop_reason = StopReason::IterationLimit;

        for _ in 0..self.config.max_iterations {
            let candidates = self.neighbors(current);
            let scores = score_candidates(objective, &candidates, self.config.parallel);
            evaluations += candidates.len();

            let Some((candidate, score)) =
                select_improvement(&candidates, &scores, current_score)
            else {
                info!(%current, score = current_score, "no better neighbor, stopping");
                stop_reason = StopReason::LocalOptimum;
                break;
            };

            let next = candidate.clamped();
            current_score = if next == candidate {
                score
            } else {
                evaluations += 1;
                objective.evaluate(next)
            };
            current = next;
            info!(pair = %current, score = current_score, "moved");
            moves.push(Move {
                pair: current,
                score: current_score,
                radius: None,
            });
        }

        info!(
            best = %current,
            score = current_score,
            evaluations,
            reason = %stop_reason,
            "fixed-step optimization finished"
        );

        OptimizationResult {
            start,
            start_score,
            best: current,
            best_score: current_score,
            moves,
            evaluations,
            stop_reason,
        }
    }
}

//! Hill climbing over a widening hollow-square neighborhood.
//!
//! A failed search at radius r grows the square to r + 1; a successful one
//! moves and retries at the same radius. The search ends once the radius
//! exceeds `max_radius`, so plateaus up to that distance are crossed.

use tracing::info;

use super::{Move, OptimizationResult, StopReason, score_candidates, select_improvement};
use crate::domain::objective::Objective;
use crate::domain::parameters::ParameterPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpandingRadiusConfig {
    pub max_radius: usize,
    /// Optional cap on accepted moves; `None` searches until the radius runs out.
    pub max_moves: Option<usize>,
    /// Score the perimeter on the rayon pool.
    pub parallel: bool,
}

impl Default for ExpandingRadiusConfig {
    fn default() -> Self {
        ExpandingRadiusConfig {
            max_radius: 5,
            max_moves: None,
            parallel: false,
        }
    }
}

/// Perimeter of the square of half-width `radius` around `center`.
///
/// Columns with `short <= 0` are skipped. The left and right columns
/// contribute every point with `long > short`. Interior columns contribute
/// their bottom and top points together, and only when the bottom point
/// satisfies `long - radius > short`; the top point is not checked on its
/// own. The interior of the square is never revisited.
pub fn hollow_square(center: ParameterPair, radius: usize) -> Vec<ParameterPair> {
    let r = radius as i64;
    let center_short = center.short() as i64;
    let center_long = center.long() as i64;
    let mut points = Vec::new();

    for i in -r..=r {
        let short = center_short + i;
        if short <= 0 {
            continue;
        }

        if i == -r || i == r {
            for j in -r..=r {
                let long = center_long + j;
                if long <= short {
                    continue;
                }
                points.extend(ParameterPair::at(short, long));
            }
        } else if center_long - r > short {
            points.extend(ParameterPair::at(short, center_long - r));
            points.extend(ParameterPair::at(short, center_long + r));
        }
    }

    points
}

#[derive(Debug, Clone, Default)]
pub struct ExpandingRadiusOptimizer {
    config: ExpandingRadiusConfig,
}

impl ExpandingRadiusOptimizer {
    pub fn new(config: ExpandingRadiusConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExpandingRadiusConfig {
        &self.config
    }

    pub fn optimize(&self, objective: &dyn Objective, start: ParameterPair) -> OptimizationResult {
        let start_score = objective.evaluate(start);
        let mut evaluations = 1;
        info!(%start, score = start_score, "starting expanding-radius optimization");

        let mut current = start;
        let mut current_score = start_score;
        let mut moves = Vec::new();
        let mut stop_reason = StopReason::RadiusExhausted;
        let mut radius = 1;

        while radius <= self.config.max_radius {
            if self
                .config
                .max_moves
                .is_some_and(|limit| moves.len() >= limit)
            {
                stop_reason = StopReason::IterationLimit;
                break;
            }

            let candidates = hollow_square(current, radius);
            let scores = score_candidates(objective, &candidates, self.config.parallel);
            evaluations += candidates.len();

            match select_improvement(&candidates, &scores, current_score) {
                Some((candidate, score)) => {
                    let next = candidate.clamped();
                    current_score = if next == candidate {
                        score
                    } else {
                        evaluations += 1;
                        objective.evaluate(next)
                    };
                    current = next;
                    info!(pair = %current, score = current_score, radius, "found better neighbor");
                    moves.push(Move {
                        pair: current,
                        score: current_score,
                        radius: Some(radius),
                    });
                }
                None => {
                    info!(radius, "no better neighbor, increasing radius");
                    radius += 1;
                }
            }
        }

        info!(
            best = %current,
            score = current_score,
            evaluations,
            reason = %stop_reason,
            "expanding-radius optimization finished"
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

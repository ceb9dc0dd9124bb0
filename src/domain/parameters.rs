//! (short window, long window) points on the integer search lattice.

use std::fmt;

use super::error::SmaCrossError;

/// A pair of moving-average windows.
///
/// Pairs built with [`ParameterPair::new`] have both windows at least 1.
/// Search candidates from [`ParameterPair::offset`] may carry a zero window;
/// its average is never defined, so the pair trades nothing and scores the
/// initial cash. `long > short` is not required either: optimizers restore
/// both conditions with [`ParameterPair::clamped`] after every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterPair {
    short: usize,
    long: usize,
}

impl ParameterPair {
    /// Fails fast on a non-positive window instead of clamping it.
    pub fn new(short: i64, long: i64) -> Result<Self, SmaCrossError> {
        if short < 1 {
            return Err(SmaCrossError::InvalidWindow {
                name: "short",
                value: short,
            });
        }
        if long < 1 {
            return Err(SmaCrossError::InvalidWindow {
                name: "long",
                value: long,
            });
        }
        Ok(Self {
            short: short as usize,
            long: long as usize,
        })
    }

    /// Lattice point at the given signed coordinates, if both are positive.
    pub fn at(short: i64, long: i64) -> Option<Self> {
        Self::new(short, long).ok()
    }

    pub fn short(&self) -> usize {
        self.short
    }

    pub fn long(&self) -> usize {
        self.long
    }

    /// Candidate displaced by (`d_short`, `d_long`). Windows that would go
    /// negative stop at 0, which clamps to the same point a negative window
    /// would.
    pub fn offset(&self, d_short: i64, d_long: i64) -> Self {
        let shift = |window: usize, delta: i64| (window as i64 + delta).max(0) as usize;
        Self {
            short: shift(self.short, d_short),
            long: shift(self.long, d_long),
        }
    }

    /// short = max(1, short), then long = max(short + 1, long).
    pub fn clamped(self) -> Self {
        let short = self.short.max(1);
        let long = self.long.max(short + 1);
        Self { short, long }
    }
}

impl fmt::Display for ParameterPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.short, self.long)
    }
}

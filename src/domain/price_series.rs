//! Validated, chronologically ordered price series.
//!
//! Every rolling computation and the simulator depend on bar order, so the
//! series is checked once at construction: non-empty, strictly positive
//! closes, strictly increasing dates.

use chrono::{Duration, NaiveDate};

use super::error::SmaCrossError;
use super::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct PriceSeries {
    bars: Vec<OhlcvBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<OhlcvBar>) -> Result<Self, SmaCrossError> {
        if bars.is_empty() {
            return Err(SmaCrossError::EmptySeries);
        }
        for (index, bar) in bars.iter().enumerate() {
            if !(bar.close > 0.0) || !bar.close.is_finite() {
                return Err(SmaCrossError::NonPositivePrice {
                    index,
                    price: bar.close,
                });
            }
        }
        for pair in bars.windows(2) {
            if pair[1].date == pair[0].date {
                return Err(SmaCrossError::DuplicateDate { date: pair[1].date });
            }
            if pair[1].date < pair[0].date {
                return Err(SmaCrossError::Data {
                    reason: format!(
                        "bars out of order: {} follows {}",
                        pair[1].date, pair[0].date
                    ),
                });
            }
        }
        Ok(Self { bars })
    }

    /// Builds a daily series from bare closes, dated consecutively from `start`.
    pub fn from_closes(start: NaiveDate, closes: &[f64]) -> Result<Self, SmaCrossError> {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar::from_close(start + Duration::days(i as i64), close))
            .collect();
        Self::new(bars)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn bars(&self) -> &[OhlcvBar] {
        &self.bars
    }

    pub fn closes(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    pub fn first_close(&self) -> f64 {
        self.bars[0].close
    }

    pub fn last_close(&self) -> f64 {
        self.bars[self.bars.len() - 1].close
    }

    pub fn first_date(&self) -> NaiveDate {
        self.bars[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.bars[self.bars.len() - 1].date
    }
}

#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use smacross::domain::error::SmaCrossError;
pub use smacross::domain::ohlcv::OhlcvBar;
use smacross::domain::price_series::PriceSeries;
use smacross::ports::data_port::DataPort;
use std::io::Write;

pub struct MockDataPort {
    pub bars: Vec<OhlcvBar>,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            bars: Vec::new(),
            error: None,
        }
    }

    pub fn with_bars(mut self, bars: Vec<OhlcvBar>) -> Self {
        self.bars = bars;
        self
    }

    pub fn with_error(mut self, reason: &str) -> Self {
        self.error = Some(reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SmaCrossError> {
        if let Some(reason) = &self.error {
            return Err(SmaCrossError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .bars
            .iter()
            .filter(|b| start_date.is_none_or(|s| b.date >= s))
            .filter(|b| end_date.is_none_or(|e| b.date <= e))
            .cloned()
            .collect())
    }

    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmaCrossError> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, self.bars.len()))),
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn start_date() -> NaiveDate {
    date(2020, 1, 1)
}

/// Daily bars from `start_date()` with the given closes.
pub fn make_bars(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| OhlcvBar::from_close(start_date() + Duration::days(i as i64), c))
        .collect()
}

pub fn series(closes: &[f64]) -> PriceSeries {
    PriceSeries::from_closes(start_date(), closes).unwrap()
}

/// `n` closes rising linearly from `from` to `to` inclusive.
pub fn linear_closes(n: usize, from: f64, to: f64) -> Vec<f64> {
    let step = (to - from) / (n - 1) as f64;
    (0..n).map(|i| from + step * i as f64).collect()
}

/// Trending wave: several full crossover cycles on top of a mild drift.
pub fn wave_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            100.0 + 0.05 * t + 15.0 * (t / 12.0).sin() + 4.0 * (t / 3.7).cos()
        })
        .collect()
}

pub fn closes_to_csv(closes: &[f64]) -> String {
    let mut csv = String::from("Date,Open,High,Low,Close,Adj Close,Volume\n");
    for bar in make_bars(closes) {
        csv.push_str(&format!(
            "{},{},{},{},{},{},1000\n",
            bar.date, bar.close, bar.close, bar.close, bar.close, bar.close
        ));
    }
    csv
}

pub fn write_temp_file(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

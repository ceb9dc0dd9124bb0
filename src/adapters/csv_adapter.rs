//! CSV file data adapter.
//!
//! Reads a headered price file such as a daily download from a quote
//! vendor. Columns are located by name, case-insensitively; only `date` and
//! `close` are required.

use crate::domain::error::SmaCrossError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

pub struct CsvAdapter {
    path: PathBuf,
}

struct Columns {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SmaCrossError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let date = find("date").ok_or_else(|| SmaCrossError::Data {
            reason: "missing date column".into(),
        })?;
        let close = find("close").ok_or_else(|| SmaCrossError::Data {
            reason: "missing close column".into(),
        })?;
        Ok(Columns {
            date,
            close,
            open: find("open"),
            high: find("high"),
            low: find("low"),
            volume: find("volume"),
        })
    }
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_records(&self) -> Result<(Columns, Vec<csv::StringRecord>), SmaCrossError> {
        let content = fs::read_to_string(&self.path)?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| SmaCrossError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let columns = Columns::from_headers(headers)?;

        let records = rdr
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SmaCrossError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
        Ok((columns, records))
    }
}

/// `YYYY-MM-DD`, ignoring any trailing time component.
fn parse_date(value: &str, line: usize) -> Result<NaiveDate, SmaCrossError> {
    let day = value
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or_default();
    NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| SmaCrossError::Data {
        reason: format!("line {}: invalid date '{}': {}", line, value, e),
    })
}

fn parse_price(record: &csv::StringRecord, column: usize, name: &str, line: usize) -> Result<f64, SmaCrossError> {
    let raw = record.get(column).unwrap_or_default();
    raw.parse().map_err(|e| SmaCrossError::Data {
        reason: format!("line {}: invalid {} value '{}': {}", line, name, raw, e),
    })
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case("null") || value.eq_ignore_ascii_case("nan")
}

impl DataPort for CsvAdapter {
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SmaCrossError> {
        let (columns, records) = self.read_records()?;
        let mut bars = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            // header is line 1
            let line = i + 2;
            let date = parse_date(record.get(columns.date).unwrap_or_default(), line)?;

            if start_date.is_some_and(|start| date < start) || end_date.is_some_and(|end| date > end) {
                continue;
            }

            if is_missing(record.get(columns.close).unwrap_or_default()) {
                warn!(line, %date, "skipping row without a close");
                continue;
            }
            let close = parse_price(record, columns.close, "close", line)?;

            let optional = |column: Option<usize>, name: &str| -> Result<f64, SmaCrossError> {
                match column {
                    Some(c) if !is_missing(record.get(c).unwrap_or_default()) => {
                        parse_price(record, c, name, line)
                    }
                    _ => Ok(close),
                }
            };
            let open = optional(columns.open, "open")?;
            let high = optional(columns.high, "high")?;
            let low = optional(columns.low, "low")?;

            let volume = match columns.volume.and_then(|c| record.get(c)) {
                Some(v) if !is_missing(v) => v.parse::<f64>().map_err(|e| SmaCrossError::Data {
                    reason: format!("line {}: invalid volume value '{}': {}", line, v, e),
                })? as i64,
                _ => 0,
            };

            bars.push(OhlcvBar {
                date,
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars.sort_by_key(|b| b.date);
        debug!(path = %self.path.display(), bars = bars.len(), "loaded price bars");
        Ok(bars)
    }

    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmaCrossError> {
        let bars = self.fetch_ohlcv(None, None)?;
        match (bars.first(), bars.last()) {
            (Some(first), Some(last)) => Ok(Some((first.date, last.date, bars.len()))),
            _ => Ok(None),
        }
    }
}

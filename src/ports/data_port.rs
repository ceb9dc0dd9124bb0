//! Price data access port trait.

use crate::domain::error::SmaCrossError;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Bars within the optional inclusive date range, oldest first.
    fn fetch_ohlcv(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<OhlcvBar>, SmaCrossError>;

    /// First date, last date and bar count of the whole source, if it has any bars.
    fn get_data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, SmaCrossError>;

    /// Fetches and validates a series ready for backtesting.
    fn fetch_series(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, SmaCrossError> {
        PriceSeries::new(self.fetch_ohlcv(start_date, end_date)?)
    }
}

//! Price cache port trait.

use crate::domain::asset::Ticker;
use crate::domain::error::CryptochartError;
use crate::domain::price_series::{DateRange, PriceSeries};
use chrono::NaiveDate;

/// Per-ticker store of cached price series, replaced wholesale on refresh.
pub trait CachePort {
    /// Creates an empty entry for `ticker` if none exists.
    fn ensure_table(&self, ticker: Ticker) -> Result<(), CryptochartError>;

    /// Replaces the whole entry for `ticker`. Readers never observe a mix of
    /// old and new rows.
    fn replace_series(
        &self,
        ticker: Ticker,
        series: &PriceSeries,
    ) -> Result<(), CryptochartError>;

    /// Most recent cached date. Missing and empty entries both yield `None`.
    fn latest_date(&self, ticker: Ticker) -> Result<Option<NaiveDate>, CryptochartError>;

    /// Cached rows ascending by date, optionally restricted to an inclusive range.
    fn read_series(
        &self,
        ticker: Ticker,
        range: Option<DateRange>,
    ) -> Result<PriceSeries, CryptochartError>;

    /// First date, last date and row count of the entry, if it holds any rows.
    fn data_range(
        &self,
        ticker: Ticker,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CryptochartError>;
}

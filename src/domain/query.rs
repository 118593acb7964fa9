//! Read access to cached series.

use crate::domain::asset::Ticker;
use crate::domain::error::CryptochartError;
use crate::domain::price_series::{DateRange, PriceSeries};
use crate::ports::cache_port::CachePort;

/// Cached series for `ticker`, ascending by date, optionally restricted to an
/// inclusive range. An empty intersection is an empty series.
pub fn load_series(
    cache: &dyn CachePort,
    ticker: Ticker,
    range: Option<DateRange>,
) -> Result<PriceSeries, CryptochartError> {
    cache.read_series(ticker, range)
}

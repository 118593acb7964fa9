//! Cache freshness judgment.
//!
//! A cached series is fresh when its latest row falls within
//! `tolerance_days` of today. The upstream source can lag a day or two, so
//! the default tolerance is two days.

use crate::domain::asset::Ticker;
use crate::domain::error::CryptochartError;
use crate::ports::cache_port::CachePort;
use chrono::{Days, NaiveDate};

pub const DEFAULT_TOLERANCE_DAYS: u32 = 2;

pub fn is_fresh(
    cache: &dyn CachePort,
    ticker: Ticker,
    tolerance_days: u32,
    today: NaiveDate,
) -> Result<bool, CryptochartError> {
    cache.ensure_table(ticker)?;
    let Some(last) = cache.latest_date(ticker)? else {
        return Ok(false);
    };
    let cutoff = today
        .checked_sub_days(Days::new(u64::from(tolerance_days)))
        .unwrap_or(NaiveDate::MIN);
    Ok(last >= cutoff)
}

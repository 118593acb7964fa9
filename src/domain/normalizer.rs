//! Raw export normalization.
//!
//! Turns an unprocessed export (arbitrary column layout, currency-formatted
//! prices) into a clean [`PriceSeries`]. Rows whose date or price cannot be
//! parsed are dropped; the remaining rows keep their source order.

use crate::domain::error::CryptochartError;
use crate::domain::price_series::{PricePoint, PriceSeries};
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Date column position in the upstream export.
pub const DEFAULT_DATE_COLUMN: usize = 0;
/// Price column position in the upstream export.
pub const DEFAULT_PRICE_COLUMN: usize = 5;

/// Unprocessed tabular artifact: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExport {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawExport {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }
}

/// Where to find the date and price fields in a raw export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnMapping {
    Positional { date: usize, price: usize },
    Named { date: String, price: String },
}

impl Default for ColumnMapping {
    fn default() -> Self {
        ColumnMapping::Positional {
            date: DEFAULT_DATE_COLUMN,
            price: DEFAULT_PRICE_COLUMN,
        }
    }
}

impl ColumnMapping {
    /// Resolves the mapping against the export's header row.
    fn resolve(&self, headers: &[String]) -> Result<(usize, usize), CryptochartError> {
        match self {
            ColumnMapping::Positional { date, price } => {
                let needed = (*date).max(*price) + 1;
                if headers.len() < needed {
                    return Err(CryptochartError::MalformedExport {
                        reason: format!(
                            "expected at least {} columns, found {}",
                            needed,
                            headers.len()
                        ),
                    });
                }
                Ok((*date, *price))
            }
            ColumnMapping::Named { date, price } => {
                let find = |name: &str| {
                    headers
                        .iter()
                        .position(|h| h.trim().eq_ignore_ascii_case(name.trim()))
                        .ok_or_else(|| CryptochartError::MalformedExport {
                            reason: format!("missing column \"{}\"", name),
                        })
                };
                Ok((find(date)?, find(price)?))
            }
        }
    }
}

pub fn normalize(
    raw: &RawExport,
    mapping: &ColumnMapping,
) -> Result<PriceSeries, CryptochartError> {
    let (date_idx, price_idx) = mapping.resolve(&raw.headers)?;

    let mut points = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;

    for row in &raw.rows {
        let date = row.get(date_idx).and_then(|s| parse_date(s));
        let price = row.get(price_idx).and_then(|s| parse_price(s));
        match (date, price) {
            (Some(date), Some(price)) => points.push(PricePoint { date, price }),
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!(dropped, kept = points.len(), "dropped unparseable export rows");
    }
    if points.is_empty() && !raw.rows.is_empty() {
        warn!(rows = raw.rows.len(), "no usable rows in export");
    }

    Ok(PriceSeries { points })
}

/// Keeps only ASCII digits and `.`, then parses what is left.
pub fn parse_price(field: &str) -> Option<f64> {
    let cleaned: String = field
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|p| p.is_finite())
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%b %d, %Y", "%B %d, %Y", "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Locale-independent calendar date parsing.
pub fn parse_date(field: &str) -> Option<NaiveDate> {
    let s = field.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    // Timestamps with fractional seconds or offsets: fall back to the date part.
    if s.len() > 10 && matches!(s.as_bytes()[10], b'T' | b' ') {
        return NaiveDate::parse_from_str(&s[..10], "%Y-%m-%d").ok();
    }
    None
}

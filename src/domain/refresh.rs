//! Cache-or-refetch orchestration.
//!
//! `ensure_current` is a plain check-then-act sequence: judge freshness,
//! and if stale acquire a raw export, normalize it and replace the cache
//! entry. Nothing is retried and nothing guards against a second process
//! writing the same cache file.

use crate::domain::asset::Asset;
use crate::domain::error::CryptochartError;
use crate::domain::freshness::{is_fresh, DEFAULT_TOLERANCE_DAYS};
use crate::domain::normalizer::{normalize, ColumnMapping, RawExport};
use crate::ports::acquisition_port::AcquisitionPort;
use crate::ports::cache_port::CachePort;
use chrono::NaiveDate;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub tolerance_days: u32,
    pub mapping: ColumnMapping,
    /// Refetch even when the cache is fresh.
    pub force: bool,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            tolerance_days: DEFAULT_TOLERANCE_DAYS,
            mapping: ColumnMapping::default(),
            force: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Cache was recent enough; no acquisition happened.
    Fresh { latest: Option<NaiveDate> },
    /// Cache entry was replaced with `rows` normalized rows.
    Refreshed { rows: usize },
}

pub fn ensure_current(
    cache: &dyn CachePort,
    acquisition: &dyn AcquisitionPort,
    asset: &Asset,
    policy: &RefreshPolicy,
    today: NaiveDate,
) -> Result<RefreshOutcome, CryptochartError> {
    let ticker = asset.ticker;

    if !policy.force && is_fresh(cache, ticker, policy.tolerance_days, today)? {
        let latest = cache.latest_date(ticker)?;
        info!(%ticker, ?latest, "cache is fresh, skipping acquisition");
        return Ok(RefreshOutcome::Fresh { latest });
    }

    info!(%ticker, name = asset.name, force = policy.force, "acquiring raw export");
    let raw = acquisition.acquire(asset)?;
    let rows = store_export(cache, asset, &raw, &policy.mapping)?;
    Ok(RefreshOutcome::Refreshed { rows })
}

/// Normalizes `raw` and replaces the asset's cache entry with the result.
pub fn store_export(
    cache: &dyn CachePort,
    asset: &Asset,
    raw: &RawExport,
    mapping: &ColumnMapping,
) -> Result<usize, CryptochartError> {
    let series = normalize(raw, mapping)?.sorted();
    cache.replace_series(asset.ticker, &series)?;
    info!(
        ticker = %asset.ticker,
        rows = series.len(),
        raw_rows = raw.rows.len(),
        "cache entry replaced"
    );
    Ok(series.len())
}

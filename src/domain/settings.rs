//! Runtime settings built from configuration.
//!
//! Every key is optional; missing keys fall back to defaults. Values that are
//! present but unusable are rejected with `ConfigInvalid`.

use crate::domain::error::CryptochartError;
use crate::domain::freshness::DEFAULT_TOLERANCE_DAYS;
use crate::domain::normalizer::{ColumnMapping, DEFAULT_DATE_COLUMN, DEFAULT_PRICE_COLUMN};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub const DEFAULT_SOURCE_URL: &str = "https://coincodex.com/crypto/{slug}/historical-data/";
pub const DEFAULT_EXPORT_START: &str = "2010-12-12";
pub const DEFAULT_CHART_OUTPUT: &str = "cryptochart.html";

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub path: PathBuf,
    pub pool_size: u32,
    pub tolerance_days: u32,
}

#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    pub download_dir: PathBuf,
    /// External command that drives the source site and drops an export into
    /// `download_dir`. Without one, the newest matching file is used as-is.
    pub command: Option<String>,
    pub args: Vec<String>,
    pub source_url: String,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub cache: CacheSettings,
    pub acquisition: AcquisitionSettings,
    pub mapping: ColumnMapping,
    pub chart_output: PathBuf,
    pub chart_markers: bool,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, CryptochartError> {
        Ok(Self {
            cache: cache_settings(config)?,
            acquisition: acquisition_settings(config)?,
            mapping: column_mapping(config)?,
            chart_output: config
                .get_string("chart", "output")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CHART_OUTPUT)),
            chart_markers: config.get_bool("chart", "markers")?.unwrap_or(true),
        })
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> CryptochartError {
    CryptochartError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, CryptochartError> {
    let value = config.get_int(section, key)?.unwrap_or(default);
    if value < 0 {
        return Err(invalid(section, key, format!("{key} must be non-negative")));
    }
    Ok(value)
}

pub fn default_cache_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("cryptochart"))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("prices.db")
}

pub fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("downloads"))
}

fn cache_settings(config: &dyn ConfigPort) -> Result<CacheSettings, CryptochartError> {
    let path = config
        .get_string("cache", "path")
        .map(PathBuf::from)
        .unwrap_or_else(default_cache_path);

    let pool_size = config.get_int("cache", "pool_size")?.unwrap_or(1);
    if pool_size < 1 {
        return Err(invalid("cache", "pool_size", "pool_size must be at least 1"));
    }

    let tolerance_days =
        non_negative(config, "cache", "tolerance_days", i64::from(DEFAULT_TOLERANCE_DAYS))?;

    Ok(CacheSettings {
        path,
        pool_size: u32::try_from(pool_size)
            .map_err(|_| invalid("cache", "pool_size", "pool_size too large"))?,
        tolerance_days: u32::try_from(tolerance_days)
            .map_err(|_| invalid("cache", "tolerance_days", "tolerance_days too large"))?,
    })
}

fn acquisition_settings(config: &dyn ConfigPort) -> Result<AcquisitionSettings, CryptochartError> {
    let download_dir = config
        .get_string("acquisition", "download_dir")
        .map(PathBuf::from)
        .unwrap_or_else(default_download_dir);

    let command = config
        .get_string("acquisition", "command")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let args = config
        .get_string("acquisition", "args")
        .map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();

    let source_url = config
        .get_string("acquisition", "source_url")
        .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string());

    let start_str = config
        .get_string("acquisition", "start_date")
        .unwrap_or_else(|| DEFAULT_EXPORT_START.to_string());
    let start_date = NaiveDate::parse_from_str(start_str.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "acquisition",
            "start_date",
            "invalid date format (expected YYYY-MM-DD)",
        )
    })?;

    Ok(AcquisitionSettings {
        download_dir,
        command,
        args,
        source_url,
        start_date,
    })
}

fn column_mapping(config: &dyn ConfigPort) -> Result<ColumnMapping, CryptochartError> {
    let date_header = config.get_string("normalizer", "date_header");
    let price_header = config.get_string("normalizer", "price_header");

    match (date_header, price_header) {
        (Some(date), Some(price)) => {
            if date.trim().eq_ignore_ascii_case(price.trim()) {
                return Err(invalid(
                    "normalizer",
                    "price_header",
                    "date_header and price_header must differ",
                ));
            }
            Ok(ColumnMapping::Named { date, price })
        }
        (Some(_), None) => Err(CryptochartError::ConfigMissing {
            section: "normalizer".into(),
            key: "price_header".into(),
        }),
        (None, Some(_)) => Err(CryptochartError::ConfigMissing {
            section: "normalizer".into(),
            key: "date_header".into(),
        }),
        (None, None) => {
            let date =
                non_negative(config, "normalizer", "date_column", DEFAULT_DATE_COLUMN as i64)?;
            let price =
                non_negative(config, "normalizer", "price_column", DEFAULT_PRICE_COLUMN as i64)?;
            if date == price {
                return Err(invalid(
                    "normalizer",
                    "price_column",
                    "date_column and price_column must differ",
                ));
            }
            Ok(ColumnMapping::Positional {
                date: date as usize,
                price: price as usize,
            })
        }
    }
}

#![allow(dead_code)]

use chrono::NaiveDate;
use cryptochart::domain::asset::{Asset, Ticker};
use cryptochart::domain::error::CryptochartError;
use cryptochart::domain::normalizer::RawExport;
use cryptochart::domain::price_series::{PricePoint, PriceSeries};
use cryptochart::ports::acquisition_port::AcquisitionPort;
use cryptochart::ports::chart_port::{Chart, ChartPort};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;

/// Acquisition double that hands out canned exports and records every call.
pub struct MockAcquisition {
    pub exports: HashMap<Ticker, RawExport>,
    pub errors: HashMap<Ticker, String>,
    pub calls: RefCell<Vec<Ticker>>,
}

impl MockAcquisition {
    pub fn new() -> Self {
        Self {
            exports: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_export(mut self, ticker: Ticker, export: RawExport) -> Self {
        self.exports.insert(ticker, export);
        self
    }

    pub fn with_error(mut self, ticker: Ticker, reason: &str) -> Self {
        self.errors.insert(ticker, reason.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl AcquisitionPort for MockAcquisition {
    fn acquire(&self, asset: &Asset) -> Result<RawExport, CryptochartError> {
        self.calls.borrow_mut().push(asset.ticker);
        if let Some(reason) = self.errors.get(&asset.ticker) {
            return Err(CryptochartError::AcquisitionFailed {
                ticker: asset.ticker.to_string(),
                reason: reason.clone(),
            });
        }
        self.exports
            .get(&asset.ticker)
            .cloned()
            .ok_or_else(|| CryptochartError::AcquisitionFailed {
                ticker: asset.ticker.to_string(),
                reason: "no export available".into(),
            })
    }
}

/// Chart double that keeps the last rendered chart instead of writing a file.
pub struct RecordingChart {
    pub rendered: RefCell<Option<Chart>>,
}

impl RecordingChart {
    pub fn new() -> Self {
        Self {
            rendered: RefCell::new(None),
        }
    }
}

impl ChartPort for RecordingChart {
    fn render(&self, chart: &Chart) -> Result<PathBuf, CryptochartError> {
        *self.rendered.borrow_mut() = Some(chart.clone());
        Ok(PathBuf::from("recorded.html"))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Export laid out like the upstream download: Date first, Close sixth.
pub fn export_rows(rows: &[(&str, &str)]) -> RawExport {
    let headers = ["Date", "Open", "High", "Low", "Volume", "Close"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = rows
        .iter()
        .map(|(d, p)| {
            vec![
                d.to_string(),
                "0".into(),
                "0".into(),
                "0".into(),
                "0".into(),
                p.to_string(),
            ]
        })
        .collect();
    RawExport::new(headers, rows)
}

/// One point per day, `days` long, starting at `start`.
pub fn daily_series(start: NaiveDate, days: u32, first_price: f64) -> PriceSeries {
    (0..days)
        .map(|i| {
            PricePoint::new(
                start + chrono::Duration::days(i64::from(i)),
                first_price + f64::from(i),
            )
        })
        .collect()
}

//! Chart rendering port trait.

use crate::domain::error::CryptochartError;
use crate::domain::price_series::PriceSeries;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct NamedSeries {
    pub label: String,
    pub series: PriceSeries,
}

/// One or two named series to draw on a shared date axis.
#[derive(Debug, Clone)]
pub struct Chart {
    pub title: String,
    pub series: Vec<NamedSeries>,
}

pub trait ChartPort {
    /// Renders the chart and returns where it was written.
    fn render(&self, chart: &Chart) -> Result<PathBuf, CryptochartError>;
}

//! Core domain types and logic.

pub mod asset;
pub mod error;
pub mod freshness;
pub mod normalizer;
pub mod price_series;
pub mod query;
pub mod refresh;
pub mod settings;

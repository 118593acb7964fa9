//! cryptochart: cached historical crypto price charts.
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`]. [`cli`] and [`prompt`] form the
//! console front end.

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
pub mod prompt;

//! Port traits: the seams between domain logic and the outside world.

pub mod acquisition_port;
pub mod cache_port;
pub mod chart_port;
pub mod config_port;

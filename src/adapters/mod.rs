//! Concrete adapter implementations for ports.

pub mod chart_svg;
pub mod command_adapter;
pub mod download_dir_adapter;
pub mod file_config_adapter;
pub mod html_chart_adapter;
pub mod raw_export;
pub mod sqlite_adapter;

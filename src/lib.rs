//! Clothing-store customer survey dashboard: age bucketing, a shared
//! read-only dataset, and four filter-and-aggregate charts.

pub mod age_range;
pub mod aggregator;
pub mod category;
pub mod charts;
pub mod config;
pub mod csv_reader;
pub mod dataset;
pub mod error;
pub mod field;
pub mod palette;
pub mod selector;
pub mod server;
pub mod tui_app;

pub use error::{DashboardError, Result};

//! Sector quartile benchmarks.
//!
//! Places a company's ratios within reference sector distributions
//! (first quartile, median, third quartile).

pub mod sector;
pub mod service;
pub mod table;

pub use sector::Sector;
pub use service::{estimated_percentile, median_position, quartile_for, SectorBenchmarkService};
pub use table::{BenchmarkTable, SectorBands};

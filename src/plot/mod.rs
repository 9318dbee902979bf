//! Per-file diagnostic chart.

pub mod chart;

pub use chart::*;

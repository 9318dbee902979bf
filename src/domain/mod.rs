//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration (`Dialect`, `DialectSpec`, `Method`, `RunConfig`)
//! - observed and calendar-aligned series (`Series`, `CalendarSeries`)
//! - fill outputs (`InterpolationResult`, `MonthlySample`)

pub mod types;

pub use types::*;

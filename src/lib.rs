//! `gapfill` library crate.
//!
//! The binary (`gapfill`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the per-file pipeline (`app::pipeline::process_content`) is usable on its own
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod calendar;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fill;
pub mod interp;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;

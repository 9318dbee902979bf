//! Filling empty calendar slots with interpolated values.

pub mod filler;

pub use filler::*;

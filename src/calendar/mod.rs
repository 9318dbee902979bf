//! Calendar reconstruction: gap detection and daily reindexing.

pub mod align;

pub use align::*;

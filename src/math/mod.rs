//! Numerical building blocks: banded elimination and small dense solves.

pub mod banded;
pub mod ols;

pub use banded::*;
pub use ols::*;

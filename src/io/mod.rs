//! Input/output helpers.
//!
//! - record parsing + input discovery (`ingest`)
//! - filled series as text (`export`)
//! - dialect and summary JSON (`json`)

pub mod export;
pub mod ingest;
pub mod json;

pub use export::*;
pub use ingest::*;
pub use json::*;

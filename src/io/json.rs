//! JSON files: dialect overrides (input) and the run summary (output).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::domain::DialectSpec;
use crate::error::AppError;
use crate::report::RunSummary;

/// Read a dialect description.
pub fn read_dialect_json(path: &Path) -> Result<DialectSpec, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open dialect JSON '{}': {e}", path.display())))?;
    let spec: DialectSpec = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid dialect JSON '{}': {e}", path.display())))?;
    Ok(spec)
}

/// Write `summary.json`.
pub fn write_summary_json(path: &Path, summary: &RunSummary) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create summary JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(BufWriter::new(file), summary)
        .map_err(|e| AppError::new(2, format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

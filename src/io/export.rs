//! Write filled series as plain text.
//!
//! One `date value` pair per line, space separated, no header. Empty slots are
//! written as `nan` so every calendar day appears exactly once. Values keep a
//! decimal point (`1.0`, not `1`).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::TimePoint;
use crate::error::AppError;

/// Write dated values to `path`, replacing any existing file.
pub fn write_series_txt<I>(path: &Path, points: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = TimePoint>,
{
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    let mut out = BufWriter::new(file);

    for p in points {
        writeln!(out, "{}", format_point(&p))
            .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    }

    out.flush()
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))?;
    Ok(())
}

fn format_point(p: &TimePoint) -> String {
    match p.value {
        Some(v) => format!("{} {v:?}", p.date.format("%Y-%m-%d")),
        None => format!("{} nan", p.date.format("%Y-%m-%d")),
    }
}

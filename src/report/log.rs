//! The per-run log file.
//!
//! Append-only: a header with the run timestamp, one block per processed file,
//! and a footer with the elapsed time. It is a plain-text artifact of the run and
//! separate from the `tracing` diagnostics on stderr.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::AppError;

pub struct RunLog {
    path: PathBuf,
    out: BufWriter<File>,
    started: Instant,
}

impl RunLog {
    /// Create the log file and write its header.
    pub fn create(path: &Path, stamp: &str, input: &Path) -> Result<Self, AppError> {
        let file = File::create(path)
            .map_err(|e| AppError::new(2, format!("Failed to create run log '{}': {e}", path.display())))?;
        let mut log = Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            started: Instant::now(),
        };
        log.write(&format!(
            "gapfill run {stamp}\nInput: {}\n",
            input.display()
        ))?;
        Ok(log)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a block of text, followed by a blank line.
    pub fn write(&mut self, text: &str) -> Result<(), AppError> {
        writeln!(self.out, "{}", text.trim_end())
            .and_then(|_| writeln!(self.out))
            .map_err(|e| self.io_error(e))
    }

    /// Write the footer and flush.
    pub fn finish(mut self, processed: usize, failed: usize) -> Result<(), AppError> {
        let minutes = self.started.elapsed().as_secs_f64() / 60.0;
        self.write(&format!(
            "Files processed: {processed} ({failed} failed)\nElapsed: {minutes:.2} minutes"
        ))?;
        self.out.flush().map_err(|e| self.io_error(e))
    }

    fn io_error(&self, e: std::io::Error) -> AppError {
        AppError::new(2, format!("Failed to write run log '{}': {e}", self.path.display()))
    }
}

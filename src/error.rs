//! Error types.
//!
//! Two layers:
//!
//! - `RecordError` / `SeriesError`: typed, file-scoped failures raised by the core
//!   (parsing, alignment, interpolation). They never abort a batch.
//! - `AppError`: what the binary reports on exit (message + process exit code).

use thiserror::Error;

use crate::domain::Method;

/// Why a single input line could not be turned into a record.
///
/// Any of these stops consumption of the file at that line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("line has {found} field(s), expected at least {expected}")]
    MissingField { expected: usize, found: usize },
    #[error("invalid date '{0}'")]
    BadDate(String),
    #[error("value '{0}' is neither a number nor a no-data sentinel")]
    UnknownSentinelFormat(String),
    #[error("unreadable line: {0}")]
    Unreadable(String),
}

/// File-scoped failures of the gap-filling core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SeriesError {
    #[error("no parsable records")]
    EmptySeries,
    #[error("{method} needs at least {needed} known values, found {found}")]
    InsufficientNodes {
        method: Method,
        needed: usize,
        found: usize,
    },
    #[error("{method} failed numerically: {reason}")]
    NumericalFailure { method: Method, reason: String },
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

//! Record parsing for GRDC-style station exports.
//!
//! This module turns one raw input file into dated records:
//!
//! - **Fixed header**: exactly `header_lines` leading lines are skipped
//! - **Fail-fast**: the first malformed line ends the record stream; everything
//!   before it is kept and the offending line is reported
//! - **No-data normalization**: sentinels and textual `nan` become `None`
//! - **No reordering**: records come out in file order, duplicates included

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::{DateLayout, DialectSpec, Separator, TimePoint};
use crate::error::{AppError, RecordError};

/// The line that stopped parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Truncation {
    /// 1-based line number in the file (header included).
    pub line: usize,
    pub content: String,
    pub error: RecordError,
}

/// Parser output: records in file order plus diagnostics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedRecords {
    pub records: Vec<TimePoint>,
    /// Non-empty data lines consumed, including the truncating one.
    pub lines_read: usize,
    pub truncation: Option<Truncation>,
}

/// Parse raw file content under the given dialect.
pub fn parse_records(content: &str, spec: &DialectSpec) -> ParsedRecords {
    let body = skip_header(content, spec.header_lines);
    match spec.separator {
        Separator::Whitespace => parse_whitespace(body, spec),
        Separator::Delimited(delim) => parse_delimited(body, delim, spec),
    }
}

/// Read a file as text. Invalid UTF-8 (common in GRDC headers) is replaced, not rejected.
pub fn read_input(path: &Path) -> Result<String, AppError> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::new(2, format!("Failed to read '{}': {e}", path.display())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Resolve the input argument to a sorted list of files.
///
/// A file is processed on its own; a directory contributes its regular files
/// (not recursing into subdirectories).
pub fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>, AppError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path).map_err(|e| {
        AppError::new(2, format!("Failed to list input directory '{}': {e}", path.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry
            .map_err(|e| AppError::new(2, format!("Failed to read directory entry: {e}")))?;
        let p = entry.path();
        if p.is_file() {
            files.push(p);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(AppError::new(
            2,
            format!("No input files found in '{}'.", path.display()),
        ));
    }
    Ok(files)
}

fn skip_header(content: &str, n: usize) -> &str {
    let mut rest = content;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

fn parse_whitespace(body: &str, spec: &DialectSpec) -> ParsedRecords {
    let mut out = ParsedRecords::default();

    for (idx, line) in body.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        out.lines_read += 1;

        let fields: Vec<&str> = line.split_whitespace().collect();
        match parse_fields(&fields, spec) {
            Ok(point) => out.records.push(point),
            Err(error) => {
                out.truncation = Some(Truncation {
                    line: spec.header_lines + idx + 1,
                    content: line.to_string(),
                    error,
                });
                break;
            }
        }
    }

    out
}

fn parse_delimited(body: &str, delim: char, spec: &DialectSpec) -> ParsedRecords {
    let mut out = ParsedRecords::default();

    // `DialectSpec::validate` guarantees an ASCII delimiter.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delim as u8)
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    for result in reader.records() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
                out.lines_read += 1;
                out.truncation = Some(Truncation {
                    line: spec.header_lines + line,
                    content: String::new(),
                    error: RecordError::Unreadable(e.to_string()),
                });
                break;
            }
        };

        if record.iter().all(str::is_empty) {
            continue;
        }
        out.lines_read += 1;

        let fields: Vec<&str> = record.iter().collect();
        match parse_fields(&fields, spec) {
            Ok(point) => out.records.push(point),
            Err(error) => {
                // csv positions are 1-based within the body.
                let line = record.position().map(|p| p.line() as usize).unwrap_or(0);
                out.truncation = Some(Truncation {
                    line: spec.header_lines + line,
                    content: fields.join(&delim.to_string()),
                    error,
                });
                break;
            }
        }
    }

    out
}

fn parse_fields(fields: &[&str], spec: &DialectSpec) -> Result<TimePoint, RecordError> {
    let expected = spec.date.fields_needed() + spec.value_from_end.max(1);
    if fields.len() < expected {
        return Err(RecordError::MissingField {
            expected,
            found: fields.len(),
        });
    }

    let date = parse_date(fields, spec.date)?;
    let token = fields[fields.len() - spec.value_from_end.max(1)];
    let value = parse_value(token, spec)?;
    Ok(TimePoint::new(date, value))
}

fn parse_date(fields: &[&str], layout: DateLayout) -> Result<NaiveDate, RecordError> {
    let raw = match layout {
        DateLayout::SplitYmd => fields[..3].join("-"),
        DateLayout::IsoField(idx) => fields[idx].to_string(),
    };
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| RecordError::BadDate(raw))
}

fn parse_value(token: &str, spec: &DialectSpec) -> Result<Option<f64>, RecordError> {
    if spec.nan_tokens && token.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    let v = token
        .parse::<f64>()
        .map_err(|_| RecordError::UnknownSentinelFormat(token.to_string()))?;
    if !v.is_finite() {
        return if spec.nan_tokens {
            Ok(None)
        } else {
            Err(RecordError::UnknownSentinelFormat(token.to_string()))
        };
    }
    if spec.is_sentinel(v) {
        return Ok(None);
    }
    Ok(Some(v))
}

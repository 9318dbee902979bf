//! The per-file gap-filling pipeline.
//!
//! `process_content` is the whole computation for one input file:
//! parse -> deduplicate -> align onto the calendar -> fill with every method ->
//! (monthly) first-of-month subsample
//!
//! It never touches the filesystem, so the `run` and `gaps` commands (and tests)
//! share it and only differ in what they do with the result.

use chrono::NaiveDate;

use crate::calendar::{Alignment, align};
use crate::domain::{Cadence, DialectSpec, Method, MonthlySample, Series};
use crate::error::SeriesError;
use crate::fill::{FillOutcome, fill_all, monthly_samples};
use crate::io::ingest::{Truncation, parse_records};

/// Everything computed for one file.
#[derive(Debug, Clone)]
pub struct FileRun {
    pub lines_read: usize,
    pub truncation: Option<Truncation>,
    /// Dates that appeared more than once; only the first record was kept.
    pub duplicates: Vec<NaiveDate>,
    pub series: Series,
    pub core: Result<FilledFile, SeriesError>,
}

/// Alignment and fills of a file with at least one record.
#[derive(Debug, Clone)]
pub struct FilledFile {
    pub alignment: Alignment,
    pub fills: Vec<FillOutcome>,
    /// First-of-month subsamples, only for monthly sources.
    pub monthly: Option<Vec<MonthlySample>>,
}

/// Run the full computation on one file's content.
pub fn process_content(content: &str, dialect: &DialectSpec, methods: &[Method]) -> FileRun {
    let parsed = parse_records(content, dialect);
    let (series, duplicates) = Series::from_records(&parsed.records);

    let core = align(&series).map(|alignment| {
        let fills = fill_all(&alignment.calendar, methods);
        let monthly = match dialect.cadence {
            Cadence::Monthly => Some(monthly_samples(&fills)),
            Cadence::Daily => None,
        };
        FilledFile {
            alignment,
            fills,
            monthly,
        }
    });

    FileRun {
        lines_read: parsed.lines_read,
        truncation: parsed.truncation,
        duplicates,
        series,
        core,
    }
}

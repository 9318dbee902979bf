//! Reporting: per-file summaries, their text form, and the run log.
//!
//! `FileSummary` is the single record of what happened to one input file. The
//! text formatter, the run log and `summary.json` are all views of it.

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::FileRun;
use crate::calendar::AlignmentStats;
use crate::domain::Method;

pub mod format;
pub mod log;

pub use format::*;
pub use log::RunLog;

/// What happened to one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileSummary {
    pub file: String,
    pub lines_read: usize,
    pub truncation: Option<TruncationSummary>,
    pub duplicates: Vec<NaiveDate>,
    /// Absent when the file had no usable records.
    pub calendar: Option<CalendarSummary>,
    pub methods: Vec<MethodSummary>,
    /// File-level failure (e.g. no records at all).
    pub error: Option<String>,
    /// Outputs that could not be written. Filled in by the caller.
    pub output_errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TruncationSummary {
    pub line: usize,
    pub content: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarSummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub length: usize,
    pub gaps: Vec<NaiveDate>,
    #[serde(flatten)]
    pub stats: AlignmentStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MethodSummary {
    pub method: Method,
    pub filled: Option<usize>,
    pub error: Option<String>,
}

impl FileSummary {
    pub fn from_run(file: impl Into<String>, run: &FileRun) -> Self {
        let truncation = run.truncation.as_ref().map(|t| TruncationSummary {
            line: t.line,
            content: t.content.clone(),
            reason: t.error.to_string(),
        });

        let (calendar, methods, error) = match &run.core {
            Ok(filled) => {
                let a = &filled.alignment;
                let calendar = CalendarSummary {
                    start: a.start(),
                    end: a.end(),
                    length: a.calendar.len(),
                    gaps: a.gaps.clone(),
                    stats: a.stats,
                };
                let methods = filled
                    .fills
                    .iter()
                    .map(|f| match &f.result {
                        Ok(r) => MethodSummary {
                            method: f.method,
                            filled: Some(r.filled),
                            error: None,
                        },
                        Err(e) => MethodSummary {
                            method: f.method,
                            filled: None,
                            error: Some(e.to_string()),
                        },
                    })
                    .collect();
                (Some(calendar), methods, None)
            }
            Err(e) => (None, Vec::new(), Some(e.to_string())),
        };

        Self {
            file: file.into(),
            lines_read: run.lines_read,
            truncation,
            duplicates: run.duplicates.clone(),
            calendar,
            methods,
            error,
            output_errors: Vec::new(),
        }
    }

    /// Summary of a file that could not be read at all.
    pub fn unreadable(file: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            lines_read: 0,
            truncation: None,
            duplicates: Vec::new(),
            calendar: None,
            methods: Vec::new(),
            error: Some(reason.into()),
            output_errors: Vec::new(),
        }
    }

    /// A file fails when it produced no calendar. Method failures alone do not count.
    pub fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Everything written to `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub tool: String,
    pub started: String,
    pub input: String,
    pub methods: Vec<Method>,
    pub files: Vec<FileSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::process_content;
    use crate::domain::{Dialect, DialectSpec};

    #[test]
    fn summary_of_a_filled_file() {
        let spec = DialectSpec::builtin(Dialect::Daily);
        let content = "h\nh\nh\nh\nh\n2001 05 01 00 00 4.0\n2001 05 04 00 00 7.0\n";
        let run = process_content(content, &spec, &[Method::LinearSpline, Method::CubicSpline]);
        let summary = FileSummary::from_run("st.day", &run);

        let cal = summary.calendar.as_ref().unwrap();
        assert_eq!(cal.length, 4);
        assert_eq!(cal.gaps.len(), 2);
        assert_eq!(summary.methods[0].filled, Some(2));
        assert!(summary.methods[1].error.is_some());
        assert!(!summary.failed());
    }

    #[test]
    fn empty_file_is_a_failure() {
        let spec = DialectSpec::builtin(Dialect::Daily);
        let run = process_content("", &spec, &Method::DEFAULTS);
        let summary = FileSummary::from_run("empty.day", &run);
        assert!(summary.failed());
        assert_eq!(summary.error.as_deref(), Some("no parsable records"));
    }

    #[test]
    fn serializes_flat_calendar_stats() {
        let spec = DialectSpec::builtin(Dialect::Daily);
        let content = "h\nh\nh\nh\nh\n2001 05 01 00 00 4.0\n";
        let run = process_content(content, &spec, &[Method::LinearSpline]);
        let json = serde_json::to_value(FileSummary::from_run("a", &run)).unwrap();
        assert_eq!(json["calendar"]["observed"], 1);
        assert_eq!(json["calendar"]["start"], "2001-05-01");
        assert_eq!(json["methods"][0]["method"], "linear-spline");
    }
}

//! Shared domain types.
//!
//! The core types (`TimePoint`, `Series`, `CalendarSeries`, `InterpolationResult`)
//! are plain values: every one of them is built once per input file and never
//! mutated afterwards.

use std::fmt;
use std::path::PathBuf;

use chrono::{Datelike, Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Interpolation methods understood by the gap filler.
///
/// The first three are enabled by default; the rest are opt-in via `--method`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Method {
    /// Piecewise linear between the two bracketing known values.
    LinearSpline,
    /// Interpolating quadratic B-spline through all known values.
    QuadraticSpline,
    /// Local cubic through the four nearest known values on each interval.
    PiecewisePolynomial,
    /// Interpolating cubic B-spline with not-a-knot end conditions.
    CubicSpline,
    /// Global interpolating polynomial (barycentric form).
    Barycentric,
    /// Monotone piecewise cubic Hermite (Fritsch–Carlson).
    MonotonicCubic,
}

impl Method {
    pub const ALL: [Method; 6] = [
        Method::LinearSpline,
        Method::QuadraticSpline,
        Method::PiecewisePolynomial,
        Method::CubicSpline,
        Method::Barycentric,
        Method::MonotonicCubic,
    ];

    pub const DEFAULTS: [Method; 3] = [
        Method::LinearSpline,
        Method::QuadraticSpline,
        Method::PiecewisePolynomial,
    ];

    /// Stable identifier used in file names, logs and JSON.
    pub fn id(self) -> &'static str {
        match self {
            Method::LinearSpline => "linear-spline",
            Method::QuadraticSpline => "quadratic-spline",
            Method::PiecewisePolynomial => "piecewise-polynomial",
            Method::CubicSpline => "cubic-spline",
            Method::Barycentric => "barycentric",
            Method::MonotonicCubic => "monotonic-cubic",
        }
    }

    /// Minimum number of known values the method needs to be evaluated.
    pub fn min_nodes(self) -> usize {
        match self {
            Method::LinearSpline => 2,
            Method::QuadraticSpline => 3,
            Method::PiecewisePolynomial => 4,
            Method::CubicSpline => 4,
            Method::Barycentric => 2,
            Method::MonotonicCubic => 2,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Built-in input dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// GRDC daily export: `YYYY MM DD HH MM VALUE`, 5 header lines.
    Daily,
    /// GRDC monthly export: `YYYY-MM-DD;hh:mm;Original;Calculated;Flag`, 39 header lines.
    Monthly,
}

/// Sampling cadence of the source file.
///
/// Monthly sources get an extra first-of-month subsample of every filled series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Monthly,
}

/// How a data line is split into fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    /// Runs of ASCII whitespace.
    Whitespace,
    /// A single delimiter character (fields are trimmed).
    Delimited(char),
}

/// Where the date lives on a data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateLayout {
    /// The first three fields are year, month and day.
    SplitYmd,
    /// A single `YYYY-MM-DD` field at the given position.
    IsoField(usize),
}

impl DateLayout {
    /// Number of leading fields the layout needs.
    pub fn fields_needed(self) -> usize {
        match self {
            DateLayout::SplitYmd => 3,
            DateLayout::IsoField(idx) => idx + 1,
        }
    }
}

/// Full description of an input file format.
///
/// The built-in dialects are produced by `DialectSpec::builtin`; any field can be
/// overridden from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialectSpec {
    pub header_lines: usize,
    pub separator: Separator,
    pub date: DateLayout,
    /// Position of the value field counted from the end of the line (1 = last).
    pub value_from_end: usize,
    /// Numeric no-data markers. Matching is on the parsed number, so `-9999`,
    /// `-9999.0` and `-9999.000` are all the same sentinel.
    pub sentinels: Vec<f64>,
    /// Treat textual `nan` and `inf` (any case) as no-data. When off, such a
    /// token truncates the file like any other unreadable value.
    #[serde(default = "default_true")]
    pub nan_tokens: bool,
    pub cadence: Cadence,
}

fn default_true() -> bool {
    true
}

impl DialectSpec {
    pub fn builtin(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Daily => DialectSpec {
                header_lines: 5,
                separator: Separator::Whitespace,
                date: DateLayout::SplitYmd,
                value_from_end: 1,
                sentinels: vec![-9999.0],
                nan_tokens: true,
                cadence: Cadence::Daily,
            },
            Dialect::Monthly => DialectSpec {
                header_lines: 39,
                separator: Separator::Delimited(';'),
                date: DateLayout::IsoField(0),
                value_from_end: 3,
                sentinels: vec![-999.0, -9999.0],
                nan_tokens: true,
                cadence: Cadence::Monthly,
            },
        }
    }

    pub fn is_sentinel(&self, value: f64) -> bool {
        self.sentinels.iter().any(|s| *s == value)
    }

    /// Reject settings the parser cannot honour.
    pub fn validate(&self) -> Result<(), String> {
        if let Separator::Delimited(c) = self.separator {
            if !c.is_ascii() || c == '\n' || c == '\r' || c == '"' {
                return Err(format!("unsupported delimiter {c:?}"));
            }
        }
        if self.value_from_end == 0 {
            return Err("value_from_end counts from 1 (the last field)".to_string());
        }
        if self.sentinels.iter().any(|s| !s.is_finite()) {
            return Err("sentinels must be finite numbers".to_string());
        }
        Ok(())
    }
}

/// A single dated observation. `None` means "no usable value".
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimePoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

impl TimePoint {
    pub fn new(date: NaiveDate, value: Option<f64>) -> Self {
        Self { date, value }
    }
}

/// Observed points, strictly increasing by date.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series {
    points: Vec<TimePoint>,
}

impl Series {
    /// Build a series from records in file order.
    ///
    /// Records are sorted stably by date and the first occurrence of a repeated
    /// date wins. The dates of dropped duplicates are returned alongside.
    pub fn from_records(records: &[TimePoint]) -> (Self, Vec<NaiveDate>) {
        let mut sorted = records.to_vec();
        sorted.sort_by_key(|p| p.date);

        let mut points: Vec<TimePoint> = Vec::with_capacity(sorted.len());
        let mut duplicates = Vec::new();
        for p in sorted {
            match points.last() {
                Some(last) if last.date == p.date => duplicates.push(p.date),
                _ => points.push(p),
            }
        }
        (Self { points }, duplicates)
    }

    pub fn points(&self) -> &[TimePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Points present as dates but carrying no value.
    pub fn null_count(&self) -> usize {
        self.points.iter().filter(|p| p.value.is_none()).count()
    }
}

impl From<&CalendarSeries> for Series {
    fn from(calendar: &CalendarSeries) -> Self {
        Self {
            points: calendar.points().collect(),
        }
    }
}

/// A series with one slot per calendar day from `start` to `end` inclusive.
///
/// Dates are implicit: slot `i` is `start + i days`, so the slot index doubles as
/// the interpolation abscissa.
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarSeries {
    start: NaiveDate,
    values: Vec<Option<f64>>,
}

impl CalendarSeries {
    /// Returns `None` when `values` is empty (a calendar spans at least one day).
    pub fn new(start: NaiveDate, values: Vec<Option<f64>>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        Some(Self { start, values })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.date_at(self.values.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn date_at(&self, idx: usize) -> NaiveDate {
        self.start + Duration::days(idx as i64)
    }

    pub fn points(&self) -> impl Iterator<Item = TimePoint> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(i, v)| TimePoint::new(self.date_at(i), *v))
    }

    pub fn absent_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Known values as `(day index, value)` columns.
    pub fn nodes(&self) -> (Vec<f64>, Vec<f64>) {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|y| (i as f64, y)))
            .unzip()
    }

    /// Same calendar, new values. Length must match.
    pub(crate) fn with_values(&self, values: Vec<Option<f64>>) -> Self {
        debug_assert_eq!(values.len(), self.values.len());
        Self {
            start: self.start,
            values,
        }
    }
}

/// A calendar series whose interior gaps were filled by one method.
#[derive(Debug, Clone, PartialEq)]
pub struct InterpolationResult {
    pub method: Method,
    pub series: CalendarSeries,
    /// Number of slots that received an interpolated value.
    pub filled: usize,
}

/// First-of-month subsample of an `InterpolationResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySample {
    pub method: Method,
    pub points: Vec<TimePoint>,
}

impl MonthlySample {
    pub fn from_result(result: &InterpolationResult) -> Self {
        let points = result.series.points().filter(|p| p.date.day() == 1).collect();
        Self {
            method: result.method,
            points,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus an optional dialect JSON file).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input: PathBuf,
    pub dialect: DialectSpec,
    pub methods: Vec<Method>,
    /// Directory the run folder is created in. Defaults to the input's parent.
    pub output_root: Option<PathBuf>,
    pub plot: bool,
}

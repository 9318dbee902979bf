//! Calendar alignment: observed series → one slot per day.
//!
//! Two kinds of "missing" are tracked separately:
//!
//! - a **gap** is a date inside `[start, end]` with no record at all
//! - a **null** is a date that has a record whose value is a no-data marker
//!
//! Both end up as `None` in the calendar series; only gaps are listed in the gap set.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{CalendarSeries, Series};
use crate::error::SeriesError;

/// Result of aligning one series onto its daily calendar.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    /// Dates in the span that had no record, ascending.
    pub gaps: Vec<NaiveDate>,
    pub calendar: CalendarSeries,
    pub stats: AlignmentStats,
}

/// Counts reported in the run log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlignmentStats {
    /// Records in the (deduplicated) observed series.
    pub observed: usize,
    /// Observed records whose value was a no-data marker.
    pub nulls_before: usize,
    /// Empty slots after reindexing (`nulls_before + gaps`).
    pub nulls_after: usize,
    /// `end - start` in days (0 for a single observation).
    pub span_days: i64,
}

impl Alignment {
    pub fn start(&self) -> NaiveDate {
        self.calendar.start()
    }

    pub fn end(&self) -> NaiveDate {
        self.calendar.end()
    }
}

/// Align a series onto the contiguous daily calendar between its first and last date.
pub fn align(series: &Series) -> Result<Alignment, SeriesError> {
    let (Some(start), Some(end)) = (series.first_date(), series.last_date()) else {
        return Err(SeriesError::EmptySeries);
    };

    let span_days = (end - start).num_days();
    let len = span_days as usize + 1;

    let mut values: Vec<Option<f64>> = vec![None; len];
    let mut present = vec![false; len];
    for p in series.points() {
        let idx = (p.date - start).num_days() as usize;
        values[idx] = p.value;
        present[idx] = true;
    }

    let calendar = CalendarSeries::new(start, values).ok_or(SeriesError::EmptySeries)?;
    let gaps: Vec<NaiveDate> = present
        .iter()
        .enumerate()
        .filter(|(_, seen)| !**seen)
        .map(|(i, _)| calendar.date_at(i))
        .collect();

    let stats = AlignmentStats {
        observed: series.len(),
        nulls_before: series.null_count(),
        nulls_after: calendar.absent_count(),
        span_days,
    };

    Ok(Alignment {
        gaps,
        calendar,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimePoint;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(points: &[(NaiveDate, Option<f64>)]) -> Series {
        let records: Vec<TimePoint> = points.iter().map(|&(d, v)| TimePoint::new(d, v)).collect();
        Series::from_records(&records).0
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(align(&Series::default()), Err(SeriesError::EmptySeries));
    }

    #[test]
    fn single_point_spans_one_day() {
        let a = align(&series(&[(d(2001, 5, 5), Some(1.0))])).unwrap();
        assert!(a.gaps.is_empty());
        assert_eq!(a.calendar.len(), 1);
        assert_eq!(a.start(), a.end());
        assert_eq!(a.stats.span_days, 0);
    }

    #[test]
    fn gaps_and_nulls_are_tracked_separately() {
        let a = align(&series(&[
            (d(1951, 1, 1), Some(1.0)),
            (d(1951, 1, 2), None),
            (d(1951, 1, 5), Some(5.0)),
        ]))
        .unwrap();

        assert_eq!(a.gaps, vec![d(1951, 1, 3), d(1951, 1, 4)]);
        assert_eq!(a.calendar.values(), &[Some(1.0), None, None, None, Some(5.0)]);
        assert_eq!(a.stats.observed, 3);
        assert_eq!(a.stats.nulls_before, 1);
        assert_eq!(a.stats.nulls_after, 3);
        assert_eq!(a.stats.span_days, 4);
    }

    #[test]
    fn span_crosses_leap_day() {
        let a = align(&series(&[(d(2000, 2, 27), Some(1.0)), (d(2000, 3, 2), Some(2.0))])).unwrap();
        assert_eq!(a.calendar.len(), 5);
        assert_eq!(a.gaps, vec![d(2000, 2, 28), d(2000, 2, 29), d(2000, 3, 1)]);
    }

    #[test]
    fn aligning_a_calendar_is_idempotent() {
        let first = align(&series(&[
            (d(1990, 12, 30), Some(1.0)),
            (d(1991, 1, 2), None),
            (d(1991, 1, 4), Some(4.0)),
        ]))
        .unwrap();

        let again = align(&Series::from(&first.calendar)).unwrap();
        assert!(again.gaps.is_empty());
        assert_eq!(again.calendar, first.calendar);
    }
}

//! End-to-end scenarios through the public pipeline.

use chrono::NaiveDate;
use gapfill::app::pipeline::process_content;
use gapfill::calendar::align;
use gapfill::domain::{CalendarSeries, Dialect, DialectSpec, Method, Series, TimePoint};
use gapfill::error::{RecordError, SeriesError};
use gapfill::fill::{fill_all, fill_gaps, monthly_samples};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn daily_file(rows: &[&str]) -> String {
    let mut s = String::from("# GRDC-Daily\n# station\n# river\n# unit\n# YYYY MM DD hh mm value\n");
    for r in rows {
        s.push_str(r);
        s.push('\n');
    }
    s
}

#[test]
fn sentinels_inside_a_complete_week() {
    let content = daily_file(&[
        "1951 01 01 00 00 1.000",
        "1951 01 02 00 00 1.100",
        "1951 01 03 00 00 1.200",
        "1951 01 04 00 00 -9999.000",
        "1951 01 05 00 00 -9999",
        "1951 01 06 00 00 1.800",
        "1951 01 07 00 00 1.900",
    ]);
    let run = process_content(&content, &DialectSpec::builtin(Dialect::Daily), &Method::DEFAULTS);
    let filled = run.core.unwrap();

    assert!(filled.alignment.gaps.is_empty());
    assert_eq!(filled.alignment.calendar.len(), 7);
    assert_eq!(filled.alignment.stats.nulls_before, 2);

    let linear = filled.fills[0].result.as_ref().unwrap();
    let v = linear.series.values();
    assert!((v[3].unwrap() - 1.4).abs() < 1e-9);
    assert!((v[4].unwrap() - 1.6).abs() < 1e-9);
}

#[test]
fn missing_day_becomes_a_gap() {
    let content = daily_file(&["1951 01 01 00 00 1.0", "1951 01 03 00 00 3.0"]);
    let run = process_content(&content, &DialectSpec::builtin(Dialect::Daily), &[Method::LinearSpline]);
    let filled = run.core.unwrap();

    assert_eq!(filled.alignment.gaps, vec![d(1951, 1, 2)]);
    assert_eq!(filled.alignment.calendar.len(), 3);
    let linear = filled.fills[0].result.as_ref().unwrap();
    assert_eq!(linear.series.values()[1], Some(2.0));
}

#[test]
fn edges_are_never_extrapolated() {
    let cal = CalendarSeries::new(d(2000, 1, 1), vec![None, None, Some(5.0), Some(6.0), None]).unwrap();
    let r = fill_gaps(&cal, Method::LinearSpline).unwrap();
    assert_eq!(r.series, cal);
}

#[test]
fn monthly_subsample_has_first_of_month_rows() {
    let start = d(1990, 1, 1);
    let mut values = vec![None; 59];
    values[0] = Some(100.0);
    values[20] = Some(80.0);
    values[58] = Some(60.0);
    let cal = CalendarSeries::new(start, values).unwrap();

    let samples = monthly_samples(&fill_all(&cal, &[Method::LinearSpline]));
    let points = &samples[0].points;
    assert_eq!(points.len(), 2);
    assert_eq!(points[0], TimePoint::new(d(1990, 1, 1), Some(100.0)));
    assert_eq!(points[1].date, d(1990, 2, 1));
    // Feb 1 is day 31: between day 20 (80) and day 58 (60).
    let expected = 80.0 + (60.0 - 80.0) * (31.0 - 20.0) / (58.0 - 20.0);
    assert!((points[1].value.unwrap() - expected).abs() < 1e-9);
}

#[test]
fn monthly_file_through_the_pipeline() {
    let mut content = String::new();
    for i in 0..39 {
        content.push_str(&format!("# header {i}\n"));
    }
    content.push_str("1990-01-01;--:--;10.000;10.000;1\n");
    content.push_str("1990-02-01;--:--;-999.000;-999.000;1\n");
    content.push_str("1990-03-01;--:--;nan;nan;1\n");
    content.push_str("1990-04-01;--:--;40.000;40.000;1\n");

    let run = process_content(&content, &DialectSpec::builtin(Dialect::Monthly), &Method::DEFAULTS);
    assert!(run.truncation.is_none());
    let filled = run.core.unwrap();

    // Jan 1 to Apr 1 1990.
    assert_eq!(filled.alignment.calendar.len(), 91);
    let monthly = filled.monthly.unwrap();
    // Only two known values: the quadratic and local cubic fills are skipped.
    assert_eq!(monthly.len(), 1);
    for sample in &monthly {
        assert_eq!(sample.points.len(), 4);
        assert!(sample.points.iter().all(|p| p.value.is_some()));
    }
}

#[test]
fn empty_file_fails_with_empty_series() {
    let run = process_content(&daily_file(&[]), &DialectSpec::builtin(Dialect::Daily), &Method::DEFAULTS);
    assert_eq!(run.core.unwrap_err(), SeriesError::EmptySeries);
}

#[test]
fn bad_date_truncates_but_keeps_earlier_records() {
    let content = daily_file(&[
        "1951 01 01 00 00 1.0",
        "1951 02 30 00 00 2.0",
        "1951 01 03 00 00 3.0",
    ]);
    let run = process_content(&content, &DialectSpec::builtin(Dialect::Daily), &[Method::LinearSpline]);

    let t = run.truncation.unwrap();
    assert_eq!(t.line, 7);
    assert!(matches!(t.error, RecordError::BadDate(_)));
    assert_eq!(run.series.len(), 1);

    let filled = run.core.unwrap();
    assert_eq!(filled.alignment.calendar.len(), 1);
    assert!(matches!(
        filled.fills[0].result,
        Err(SeriesError::InsufficientNodes { found: 1, .. })
    ));
}

#[test]
fn aligning_a_complete_calendar_is_idempotent() {
    let points: Vec<TimePoint> = (0..10)
        .map(|i| TimePoint::new(d(2004, 2, 25) + chrono::Duration::days(i), (i % 3 != 0).then_some(i as f64)))
        .collect();
    let (series, _) = Series::from_records(&points);
    let first = align(&series).unwrap();
    let again = align(&Series::from(&first.calendar)).unwrap();

    assert!(first.gaps.is_empty());
    assert_eq!(again.calendar, first.calendar);
    assert!(again.gaps.is_empty());
}

//! Gap filling over a calendar series.
//!
//! Each method is run independently on the same calendar. Failures are scoped to
//! the method: a series with three known values still gets a linear and a
//! quadratic fill even though the local cubic cannot be built.

use tracing::debug;

use crate::domain::{CalendarSeries, InterpolationResult, Method, MonthlySample};
use crate::error::SeriesError;

/// Outcome of one method on one calendar series.
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    pub method: Method,
    pub result: Result<InterpolationResult, SeriesError>,
}

/// Fill the interior empty slots of `calendar` with `method`.
///
/// Known values are copied unchanged. Slots before the first or after the last
/// known value stay empty.
pub fn fill_gaps(calendar: &CalendarSeries, method: Method) -> Result<InterpolationResult, SeriesError> {
    let (xs, ys) = calendar.nodes();
    let interpolant = crate::interp::build(method, &xs, &ys)?;

    // `build` guarantees at least two nodes.
    let first = xs[0] as usize;
    let last = xs[xs.len() - 1] as usize;

    let mut values = calendar.values().to_vec();
    let mut filled = 0;
    for (idx, slot) in values.iter_mut().enumerate().take(last).skip(first + 1) {
        if slot.is_some() {
            continue;
        }
        let v = interpolant.value(idx as f64);
        if !v.is_finite() {
            return Err(SeriesError::NumericalFailure {
                method,
                reason: format!("non-finite value at {}", calendar.date_at(idx)),
            });
        }
        *slot = Some(v);
        filled += 1;
    }

    debug!(%method, nodes = xs.len(), filled, "filled calendar series");

    Ok(InterpolationResult {
        method,
        series: calendar.with_values(values),
        filled,
    })
}

/// Run every method in order. One outcome per method, same order.
pub fn fill_all(calendar: &CalendarSeries, methods: &[Method]) -> Vec<FillOutcome> {
    methods
        .iter()
        .map(|&method| FillOutcome {
            method,
            result: fill_gaps(calendar, method),
        })
        .collect()
}

/// First-of-month subsamples of every successful fill, in method order.
pub fn monthly_samples(outcomes: &[FillOutcome]) -> Vec<MonthlySample> {
    outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .map(MonthlySample::from_result)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn calendar(values: Vec<Option<f64>>) -> CalendarSeries {
        CalendarSeries::new(d(1951, 1, 1), values).unwrap()
    }

    #[test]
    fn linear_fill_between_sentinels() {
        let cal = calendar(vec![
            Some(1.0),
            Some(1.1),
            Some(1.2),
            None,
            None,
            Some(1.8),
            Some(1.9),
        ]);
        let r = fill_gaps(&cal, Method::LinearSpline).unwrap();
        let v = r.series.values();
        assert!((v[3].unwrap() - 1.4).abs() < 1e-12);
        assert!((v[4].unwrap() - 1.6).abs() < 1e-12);
        assert_eq!(r.filled, 2);
    }

    #[test]
    fn leading_and_trailing_slots_stay_empty() {
        let cal = calendar(vec![None, None, Some(5.0), Some(6.0), None]);
        let r = fill_gaps(&cal, Method::LinearSpline).unwrap();
        assert_eq!(r.series, cal);
        assert_eq!(r.filled, 0);
    }

    #[test]
    fn no_method_extrapolates() {
        let cal = calendar(vec![
            None,
            Some(1.0),
            Some(3.0),
            None,
            Some(2.0),
            Some(4.0),
            Some(4.5),
            None,
        ]);
        for method in Method::ALL {
            let r = fill_gaps(&cal, method).unwrap();
            let v = r.series.values();
            assert_eq!(v[0], None, "{method}");
            assert_eq!(v[7], None, "{method}");
            assert!(v[3].is_some(), "{method}");
        }
    }

    #[test]
    fn one_failing_method_does_not_stop_the_others() {
        let cal = calendar(vec![Some(1.0), None, Some(2.0), None, Some(4.0)]);
        let outcomes = fill_all(&cal, &Method::DEFAULTS);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].result.is_ok());
        assert!(outcomes[1].result.is_ok());
        assert_eq!(
            outcomes[2].result,
            Err(SeriesError::InsufficientNodes {
                method: Method::PiecewisePolynomial,
                needed: 4,
                found: 3
            })
        );
    }

    #[test]
    fn single_known_value_is_insufficient_for_everything() {
        let cal = calendar(vec![None, Some(2.0), None]);
        for outcome in fill_all(&cal, &Method::ALL) {
            assert!(matches!(
                outcome.result,
                Err(SeriesError::InsufficientNodes { found: 1, .. })
            ));
        }
    }

    #[test]
    fn monthly_samples_pick_first_of_month_rows() {
        let start = d(2000, 1, 1);
        let mut values = vec![None; 60];
        values[0] = Some(10.0);
        values[59] = Some(69.0);
        let cal = CalendarSeries::new(start, values).unwrap();
        let outcomes = fill_all(&cal, &[Method::LinearSpline]);
        let samples = monthly_samples(&outcomes);

        assert_eq!(samples.len(), 1);
        let points = &samples[0].points;
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, d(2000, 1, 1));
        assert_eq!(points[0].value, Some(10.0));
        assert_eq!(points[1].date, d(2000, 2, 1));
        assert!((points[1].value.unwrap() - 41.0).abs() < 1e-12);
    }

    #[test]
    fn randomized_node_identity_and_interior_coverage() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..25 {
            let len = rng.gen_range(8..120);
            let mut values: Vec<Option<f64>> = (0..len)
                .map(|_| rng.gen_bool(0.6).then(|| rng.gen_range(0.0..500.0)))
                .collect();
            // Guarantee enough nodes for every method.
            for v in values.iter_mut().step_by(2) {
                v.get_or_insert(1.0);
            }
            let cal = calendar(values.clone());
            let (xs, _) = cal.nodes();
            let (first, last) = (xs[0] as usize, xs[xs.len() - 1] as usize);

            for method in [Method::LinearSpline, Method::PiecewisePolynomial, Method::MonotonicCubic] {
                let r = fill_gaps(&cal, method).unwrap();
                for (i, (before, after)) in values.iter().zip(r.series.values()).enumerate() {
                    match before {
                        Some(v) => assert_eq!(after, &Some(*v)),
                        None if i > first && i < last => assert!(after.is_some()),
                        None => assert_eq!(after, &None),
                    }
                }
            }
        }
    }

    #[test]
    fn monotonic_cubic_stays_within_bracketing_values() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut level = 0.0;
        let values: Vec<Option<f64>> = (0..200)
            .map(|i| {
                level += rng.gen_range(0.0..3.0);
                (i % 4 == 0 || i == 199).then_some(level)
            })
            .collect();
        let cal = calendar(values);
        let r = fill_gaps(&cal, Method::MonotonicCubic).unwrap();
        let filled: Vec<f64> = r.series.values().iter().map(|v| v.unwrap()).collect();
        assert!(filled.windows(2).all(|w| w[1] >= w[0] - 1e-9));
    }
}

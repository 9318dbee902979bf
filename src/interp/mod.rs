//! Interpolation methods.
//!
//! Every method is built once from the known nodes `(x_i, y_i)` of a calendar
//! series (x = day index, strictly increasing) and then queried at the empty
//! slots between the first and last node. Queries outside the node range are
//! never made: the gap filler does not extrapolate.

use crate::domain::Method;
use crate::error::SeriesError;

pub mod barycentric;
pub mod bspline;
pub mod linear;
pub mod local_cubic;
pub mod pchip;

pub use barycentric::Barycentric;
pub use bspline::BSpline;
pub use linear::Linear;
pub use local_cubic::LocalCubic;
pub use pchip::Pchip;

/// A fitted interpolant.
pub trait Interpolant {
    /// Value at `x`, which must lie within `[x_0, x_{n-1}]`.
    ///
    /// May be non-finite if the method breaks down numerically; callers check.
    fn value(&self, x: f64) -> f64;
}

/// Build the interpolant for `method` through the given nodes.
pub fn build(method: Method, xs: &[f64], ys: &[f64]) -> Result<Box<dyn Interpolant>, SeriesError> {
    let needed = method.min_nodes();
    if xs.len() < needed {
        return Err(SeriesError::InsufficientNodes {
            method,
            needed,
            found: xs.len(),
        });
    }
    debug_assert!(xs.windows(2).all(|w| w[0] < w[1]));
    debug_assert_eq!(xs.len(), ys.len());

    let singular = || SeriesError::NumericalFailure {
        method,
        reason: "singular collocation system".to_string(),
    };

    let interpolant: Box<dyn Interpolant> = match method {
        Method::LinearSpline => Box::new(Linear::new(xs, ys)),
        Method::QuadraticSpline => Box::new(BSpline::quadratic(xs, ys).ok_or_else(singular)?),
        Method::CubicSpline => Box::new(BSpline::cubic_not_a_knot(xs, ys).ok_or_else(singular)?),
        Method::PiecewisePolynomial => Box::new(LocalCubic::new(xs, ys)),
        Method::Barycentric => Box::new(Barycentric::new(xs, ys)),
        Method::MonotonicCubic => Box::new(Pchip::new(xs, ys)),
    };
    Ok(interpolant)
}

/// Index `i` of the node interval `[x_i, x_{i+1}]` containing `x`.
///
/// Requires at least two nodes; `x` outside the range is clamped to the end intervals.
pub(crate) fn segment(xs: &[f64], x: f64) -> usize {
    xs.partition_point(|v| *v <= x)
        .saturating_sub(1)
        .min(xs.len() - 2)
}

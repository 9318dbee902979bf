//! Interpolating B-splines (quadratic and cubic).
//!
//! Given nodes `x_0 < … < x_{n-1}`, a degree-`k` interpolating spline has `n`
//! coefficients on a clamped knot vector of length `n + k + 1`. The knot choice
//! is what distinguishes the variants:
//!
//! - **quadratic**: clamped ends plus the midpoints between consecutive nodes,
//!   dropping the first and last midpoint (the even-degree analogue of not-a-knot)
//! - **cubic**: clamped ends plus the interior nodes `x_2 … x_{n-3}` (not-a-knot)
//!
//! Coefficients come from the collocation system `Σ_j c_j B_j(x_i) = y_i`, which
//! is banded and solved with `math::BandedMatrix`.

use super::Interpolant;
use crate::math::BandedMatrix;

#[derive(Debug, Clone)]
pub struct BSpline {
    degree: usize,
    knots: Vec<f64>,
    coefs: Vec<f64>,
}

impl BSpline {
    /// Quadratic interpolating spline. Needs at least 3 nodes.
    pub fn quadratic(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 3 {
            return None;
        }
        let mut knots = vec![xs[0]; 3];
        knots.extend((1..n - 2).map(|i| 0.5 * (xs[i] + xs[i + 1])));
        knots.extend([xs[n - 1]; 3]);
        Self::interpolate(2, knots, xs, ys)
    }

    /// Cubic interpolating spline with not-a-knot ends. Needs at least 4 nodes.
    pub fn cubic_not_a_knot(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        if n < 4 {
            return None;
        }
        let mut knots = vec![xs[0]; 4];
        knots.extend_from_slice(&xs[2..n - 2]);
        knots.extend([xs[n - 1]; 4]);
        Self::interpolate(3, knots, xs, ys)
    }

    fn interpolate(degree: usize, knots: Vec<f64>, xs: &[f64], ys: &[f64]) -> Option<Self> {
        let n = xs.len();
        debug_assert_eq!(knots.len(), n + degree + 1);

        let mut spline = Self {
            degree,
            knots,
            coefs: vec![0.0; n],
        };

        // Row i has non-zeros in columns span(x_i) - k ..= span(x_i).
        let rows: Vec<(usize, Vec<f64>)> = xs
            .iter()
            .map(|&x| {
                let l = spline.span(x);
                (l, spline.basis(l, x))
            })
            .collect();

        let mut lower = 0;
        let mut upper = 0;
        for (i, (l, _)) in rows.iter().enumerate() {
            let first = l - degree;
            lower = lower.max(i.saturating_sub(first));
            upper = upper.max(l.saturating_sub(i));
        }

        let mut a = BandedMatrix::zeros(n, lower, upper);
        for (i, (l, basis)) in rows.iter().enumerate() {
            for (r, &b) in basis.iter().enumerate() {
                a.set(i, l - degree + r, b);
            }
        }

        spline.coefs = a.solve(ys)?;
        Some(spline)
    }

    /// Knot span index `l` with `t_l <= x < t_{l+1}`, clamped to `[k, n-1]`.
    fn span(&self, x: f64) -> usize {
        let n = self.coefs.len();
        self.knots
            .partition_point(|t| *t <= x)
            .saturating_sub(1)
            .clamp(self.degree, n - 1)
    }

    /// The `k + 1` non-zero basis functions on span `l` at `x` (Cox–de Boor).
    fn basis(&self, l: usize, x: f64) -> Vec<f64> {
        let k = self.degree;
        let t = &self.knots;
        let mut n = vec![0.0; k + 1];
        let mut left = vec![0.0; k + 1];
        let mut right = vec![0.0; k + 1];

        n[0] = 1.0;
        for j in 1..=k {
            left[j] = x - t[l + 1 - j];
            right[j] = t[l + j] - x;
            let mut saved = 0.0;
            for r in 0..j {
                let temp = n[r] / (right[r + 1] + left[j - r]);
                n[r] = saved + right[r + 1] * temp;
                saved = left[j - r] * temp;
            }
            n[j] = saved;
        }
        n
    }
}

impl Interpolant for BSpline {
    fn value(&self, x: f64) -> f64 {
        let l = self.span(x);
        let first = l - self.degree;
        self.basis(l, x)
            .iter()
            .enumerate()
            .map(|(r, b)| self.coefs[first + r] * b)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{a} vs {b}");
    }

    #[test]
    fn basis_is_a_partition_of_unity() {
        let xs = [0.0, 1.0, 4.0, 5.0, 9.0, 10.0];
        let s = BSpline::cubic_not_a_knot(&xs, &[0.0; 6]).unwrap();
        for x in [0.0, 0.5, 2.0, 4.5, 7.0, 10.0] {
            let l = s.span(x);
            let total: f64 = s.basis(l, x).iter().sum();
            assert_close(total, 1.0);
        }
    }

    #[test]
    fn quadratic_reproduces_parabolas() {
        let xs = [0.0, 1.0, 2.0, 5.0, 6.0, 10.0, 11.0];
        let f = |x: f64| 0.5 * x * x - 3.0 * x + 2.0;
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let s = BSpline::quadratic(&xs, &ys).unwrap();
        for x in [0.5, 3.0, 4.0, 7.5, 10.5] {
            assert_close(s.value(x), f(x));
        }
    }

    #[test]
    fn cubic_reproduces_cubics() {
        let xs = [0.0, 2.0, 3.0, 7.0, 8.0, 9.0, 14.0];
        let f = |x: f64| 0.01 * x * x * x - 0.2 * x * x + x - 4.0;
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let s = BSpline::cubic_not_a_knot(&xs, &ys).unwrap();
        for x in [1.0, 2.5, 5.0, 8.5, 12.0] {
            assert_close(s.value(x), f(x));
        }
    }

    #[test]
    fn three_nodes_give_the_interpolating_parabola() {
        let s = BSpline::quadratic(&[0.0, 1.0, 3.0], &[1.0, 2.0, 10.0]).unwrap();
        // y = x^2 + 1
        assert_close(s.value(2.0), 5.0);
    }

    #[test]
    fn rejects_too_few_nodes() {
        assert!(BSpline::quadratic(&[0.0, 1.0], &[0.0, 1.0]).is_none());
        assert!(BSpline::cubic_not_a_knot(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0]).is_none());
    }
}

//! Small dense solves.
//!
//! The piecewise-polynomial method repeatedly solves tiny Vandermonde systems
//! (four nodes, four cubic coefficients). These are square, but nodes that sit
//! close together relative to the window width make them poorly conditioned, so
//! we solve them as least-squares problems via SVD with progressively looser
//! tolerances instead of a plain LU.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-12, 1e-10, 1e-8] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Coefficients `c` of the polynomial `Σ c_k u^k` through the given points.
///
/// `us` should already be centred/scaled by the caller.
pub fn polynomial_through(us: &[f64], ys: &[f64]) -> Option<Vec<f64>> {
    let n = us.len();
    if n == 0 || ys.len() != n {
        return None;
    }

    let mut v = DMatrix::<f64>::zeros(n, n);
    for (i, &u) in us.iter().enumerate() {
        let mut p = 1.0;
        for k in 0..n {
            v[(i, k)] = p;
            p *= u;
        }
    }
    let rhs = DVector::from_row_slice(ys);
    solve_least_squares(&v, &rhs).map(|c| c.iter().copied().collect())
}

/// Horner evaluation of `Σ c_k u^k`.
pub fn eval_polynomial(coefs: &[f64], u: f64) -> f64 {
    coefs.iter().rev().fold(0.0, |acc, c| acc * u + c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn cubic_through_four_points() {
        // y = 1 - u + 2u^3
        let us = [-1.0, -0.25, 0.5, 1.0];
        let ys: Vec<f64> = us.iter().map(|u| 1.0 - u + 2.0 * u * u * u).collect();
        let c = polynomial_through(&us, &ys).unwrap();
        let expected = [1.0, -1.0, 0.0, 2.0];
        for (a, b) in c.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-10, "{c:?}");
        }
        assert!((eval_polynomial(&c, 0.1) - (1.0 - 0.1 + 2.0 * 0.001)).abs() < 1e-12);
    }
}

//! Piecewise polynomial interpolation from local cubic windows.
//!
//! On each node interval `[x_i, x_{i+1}]` the value is taken from the cubic
//! through the four nearest nodes: `x_{i-1} … x_{i+2}`, with the window shifted
//! inward at both ends of the series. Neighbouring pieces share their end node,
//! so the result is continuous and passes through every node.

use super::{Interpolant, segment};
use crate::math::{eval_polynomial, polynomial_through};

const WINDOW: usize = 4;

#[derive(Debug, Clone)]
pub struct LocalCubic {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl LocalCubic {
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        }
    }

    fn window_start(&self, interval: usize) -> usize {
        interval
            .saturating_sub(1)
            .min(self.xs.len().saturating_sub(WINDOW))
    }
}

impl Interpolant for LocalCubic {
    fn value(&self, x: f64) -> f64 {
        let s = self.window_start(segment(&self.xs, x));
        let xs = &self.xs[s..s + WINDOW];
        let ys = &self.ys[s..s + WINDOW];

        // Centre and scale so the Vandermonde system stays well conditioned
        // regardless of where in a multi-decade record the window sits.
        let centre = 0.5 * (xs[0] + xs[WINDOW - 1]);
        let half = 0.5 * (xs[WINDOW - 1] - xs[0]);
        let us: Vec<f64> = xs.iter().map(|v| (v - centre) / half).collect();

        match polynomial_through(&us, ys) {
            Some(coefs) => eval_polynomial(&coefs, (x - centre) / half),
            None => f64::NAN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reproduces_cubics_everywhere() {
        let xs = [0.0, 3.0, 4.0, 9.0, 10.0, 15.0, 30.0];
        let f = |x: f64| 0.002 * x * x * x - 0.1 * x * x + x + 7.0;
        let ys: Vec<f64> = xs.iter().map(|&x| f(x)).collect();
        let p = LocalCubic::new(&xs, &ys);
        for x in [1.0, 2.0, 3.5, 6.0, 12.0, 20.0, 29.0] {
            assert!((p.value(x) - f(x)).abs() < 1e-8, "at {x}");
        }
    }

    #[test]
    fn window_is_clamped_at_both_ends() {
        let p = LocalCubic::new(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &[0.0; 6]);
        assert_eq!(p.window_start(0), 0);
        assert_eq!(p.window_start(2), 1);
        assert_eq!(p.window_start(4), 2);
    }

    #[test]
    fn only_nearby_nodes_matter() {
        // A spike far away must not influence the first interval.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let flat = LocalCubic::new(&xs, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
        let spiky = LocalCubic::new(&xs, &[1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 50.0]);
        assert_eq!(flat.value(0.5), spiky.value(0.5));
    }
}

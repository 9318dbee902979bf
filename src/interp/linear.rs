//! Piecewise linear interpolation (the degree-1 spline).

use super::{Interpolant, segment};

#[derive(Debug, Clone)]
pub struct Linear {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Linear {
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        }
    }
}

impl Interpolant for Linear {
    fn value(&self, x: f64) -> f64 {
        let i = segment(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}

//! Global polynomial interpolation in barycentric form.
//!
//! Uses the second (true) barycentric formula
//!
//! ```text
//! p(x) = Σ w_j y_j / (x - x_j)  /  Σ w_j / (x - x_j)
//! ```
//!
//! with `w_j = 1 / Π_{k≠j} (x_j - x_k)`. The products over- or underflow quickly
//! for long records, so the weights are accumulated as logarithms on the
//! rescaled abscissa `4 (x - x_k) / (x_max - x_min)` and normalised by the
//! largest one. The common factor cancels in the quotient.
//!
//! Cost is quadratic in the node count; the method is opt-in.

use super::Interpolant;

#[derive(Debug, Clone)]
pub struct Barycentric {
    xs: Vec<f64>,
    ys: Vec<f64>,
    weights: Vec<f64>,
}

impl Barycentric {
    pub fn new(xs: &[f64], ys: &[f64]) -> Self {
        let n = xs.len();
        let range = xs[n - 1] - xs[0];
        let scale = if range > 0.0 { 4.0 / range } else { 1.0 };

        let mut log_w = vec![0.0; n];
        let mut sign = vec![1.0; n];
        for j in 0..n {
            let mut acc = 0.0;
            let mut s = 1.0;
            for k in 0..n {
                if k == j {
                    continue;
                }
                let diff = scale * (xs[j] - xs[k]);
                acc -= diff.abs().ln();
                if diff < 0.0 {
                    s = -s;
                }
            }
            log_w[j] = acc;
            sign[j] = s;
        }

        let max_log = log_w.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let weights = log_w
            .iter()
            .zip(sign.iter())
            .map(|(lw, s)| s * (lw - max_log).exp())
            .collect();

        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            weights,
        }
    }
}

impl Interpolant for Barycentric {
    fn value(&self, x: f64) -> f64 {
        let mut num = 0.0;
        let mut den = 0.0;
        for ((&xj, &yj), &wj) in self.xs.iter().zip(self.ys.iter()).zip(self.weights.iter()) {
            let dx = x - xj;
            if dx == 0.0 {
                return yj;
            }
            let t = wj / dx;
            num += t * yj;
            den += t;
        }
        num / den
    }
}

//! Banded linear systems.
//!
//! Spline collocation matrices only have a few non-zeros per row (at most
//! `degree + 1`), clustered around the diagonal. A dense `n × n` matrix would be
//! far too large for multi-decade daily records, so we store the band only:
//!
//! ```text
//! a(i, j) lives at data[i * width + (j + lower - i)],  width = lower + upper + 1
//! ```
//!
//! Elimination runs without pivoting. B-spline collocation matrices that satisfy
//! the Schoenberg–Whitney conditions are totally positive, for which this is stable
//! (de Boor, *A Practical Guide to Splines*, ch. XIII), and no fill-in leaves the band.

/// Pivots smaller than this (relative to the row scale) count as singular.
const PIVOT_EPS: f64 = 1e-14;

#[derive(Debug, Clone)]
pub struct BandedMatrix {
    n: usize,
    lower: usize,
    upper: usize,
    data: Vec<f64>,
}

impl BandedMatrix {
    pub fn zeros(n: usize, lower: usize, upper: usize) -> Self {
        Self {
            n,
            lower,
            upper,
            data: vec![0.0; n * (lower + upper + 1)],
        }
    }

    fn width(&self) -> usize {
        self.lower + self.upper + 1
    }

    fn in_band(&self, i: usize, j: usize) -> bool {
        j + self.lower >= i && j <= i + self.upper
    }

    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.width() + (j + self.lower - i)
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        if i >= self.n || j >= self.n || !self.in_band(i, j) {
            return 0.0;
        }
        self.data[self.idx(i, j)]
    }

    /// Set an entry. Returns `false` (and ignores the value) outside the band.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> bool {
        if i >= self.n || j >= self.n || !self.in_band(i, j) {
            return false;
        }
        let k = self.idx(i, j);
        self.data[k] = value;
        true
    }

    /// Solve `A x = b`, consuming the matrix.
    ///
    /// Returns `None` on a (numerically) zero pivot or a non-finite solution.
    pub fn solve(mut self, b: &[f64]) -> Option<Vec<f64>> {
        let n = self.n;
        if b.len() != n {
            return None;
        }
        let mut rhs = b.to_vec();

        let scale = self
            .data
            .iter()
            .fold(0.0_f64, |m, v| m.max(v.abs()))
            .max(f64::MIN_POSITIVE);

        for k in 0..n {
            let pivot = self.get(k, k);
            if pivot.abs() <= PIVOT_EPS * scale {
                return None;
            }
            let last_row = (k + self.lower).min(n - 1);
            let last_col = (k + self.upper).min(n - 1);
            for i in (k + 1)..=last_row {
                let factor = self.get(i, k) / pivot;
                if factor == 0.0 {
                    continue;
                }
                for j in k..=last_col {
                    let v = self.get(i, j) - factor * self.get(k, j);
                    self.set(i, j, v);
                }
                rhs[i] -= factor * rhs[k];
            }
        }

        let mut x = vec![0.0; n];
        for i in (0..n).rev() {
            let last_col = (i + self.upper).min(n - 1);
            let mut s = rhs[i];
            for j in (i + 1)..=last_col {
                s -= self.get(i, j) * x[j];
            }
            x[i] = s / self.get(i, i);
        }

        if x.iter().all(|v| v.is_finite()) {
            Some(x)
        } else {
            None
        }
    }
}

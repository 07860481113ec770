//! One-dimensional interpolants over sorted sample times.

/// Minimum number of samples an interpolant is built from.
pub const MIN_SAMPLES: usize = 2;

/// Piecewise-linear interpolant that extends its edge segments beyond
/// the sampled range.
#[derive(Debug, Clone)]
pub struct Linear {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Linear {
    /// Returns None unless `xs` and `ys` have the same length of at least
    /// [MIN_SAMPLES]. `xs` must be sorted ascending.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Option<Self> {
        if xs.len() != ys.len() || xs.len() < MIN_SAMPLES {
            return None;
        }
        Some(Self { xs, ys })
    }

    pub fn eval(&self, x: f64) -> f64 {
        let Self { xs, ys } = self;
        let hi = xs.partition_point(|&v| v < x).clamp(1, xs.len() - 1);
        let lo = hi - 1;

        // Sample times give back their samples untouched.
        if x == xs[hi] {
            return ys[hi];
        }
        if x == xs[lo] {
            return ys[lo];
        }

        let dx = xs[hi] - xs[lo];
        if dx == 0.0 {
            return ys[hi];
        }

        let slope = (ys[hi] - ys[lo]) / dx;
        slope * (x - xs[lo]) + ys[lo]
    }
}

/// Picks the first sample at or after the query time, holding the first
/// and last samples outside the sampled range.
#[derive(Debug, Clone)]
pub struct NextIndex {
    xs: Vec<f64>,
}

impl NextIndex {
    /// Returns None with fewer than [MIN_SAMPLES] times. `xs` must be
    /// sorted ascending.
    pub fn new(xs: Vec<f64>) -> Option<Self> {
        if xs.len() < MIN_SAMPLES {
            return None;
        }
        Some(Self { xs })
    }

    pub fn index(&self, x: f64) -> usize {
        self.xs.partition_point(|&v| v < x).min(self.xs.len() - 1)
    }
}

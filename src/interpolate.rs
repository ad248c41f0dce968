// ============================================================================
// MONOTONE INTERPOLATION
// ============================================================================

//! Shape-preserving piecewise cubic Hermite interpolation (PCHIP).
//!
//! Derivatives follow Fritsch-Carlson with the Butland weighted harmonic mean,
//! so every segment stays inside the range spanned by its two knots.

/// How the derivative at the first and last knot is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EdgeMode {
    /// Zero slope at both ends, as if each edge knot were duplicated an
    /// infinitesimal distance outside the domain.
    #[default]
    Pinned,
    /// One-sided three-point estimate limited to keep the end segment monotone.
    ThreePoint,
}

#[derive(Debug, Clone)]
pub struct Pchip {
    xs: Vec<f64>,
    ys: Vec<f64>,
    slopes: Vec<f64>,
}

impl Pchip {
    /// Builds an interpolant through `(xs[i], ys[i])`.
    ///
    /// `xs` must be strictly increasing and at least two long; the callers in
    /// this crate always pass the 24 fixed hours.
    pub fn new(xs: &[f64], ys: &[f64], edge: EdgeMode) -> Self {
        debug_assert_eq!(xs.len(), ys.len());
        debug_assert!(xs.len() >= 2);
        debug_assert!(xs.windows(2).all(|w| w[0] < w[1]));

        let n = xs.len();
        let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let delta: Vec<f64> = ys
            .windows(2)
            .zip(&h)
            .map(|(w, h)| (w[1] - w[0]) / h)
            .collect();

        let mut slopes = vec![0.0; n];
        if n == 2 {
            slopes[0] = delta[0];
            slopes[1] = delta[0];
        } else {
            for k in 1..n - 1 {
                let (d0, d1) = (delta[k - 1], delta[k]);
                if d0 == 0.0 || d1 == 0.0 || d0.signum() != d1.signum() {
                    continue;
                }
                let w1 = 2.0 * h[k] + h[k - 1];
                let w2 = h[k] + 2.0 * h[k - 1];
                slopes[k] = (w1 + w2) / (w1 / d0 + w2 / d1);
            }
            if edge == EdgeMode::ThreePoint {
                slopes[0] = end_slope(h[0], h[1], delta[0], delta[1]);
                slopes[n - 1] = end_slope(h[n - 2], h[n - 3], delta[n - 2], delta[n - 3]);
            }
        }

        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            slopes,
        }
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let x = x.clamp(self.xs[0], self.xs[n - 1]);
        let upper = self.xs.partition_point(|&k| k <= x);
        if upper > 0 && self.xs[upper - 1] == x {
            return self.ys[upper - 1];
        }
        let k = upper.saturating_sub(1).min(n - 2);

        let h = self.xs[k + 1] - self.xs[k];
        let t = (x - self.xs[k]) / h;
        let t2 = t * t;
        let t3 = t2 * t;
        let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
        let h10 = t3 - 2.0 * t2 + t;
        let h01 = -2.0 * t3 + 3.0 * t2;
        let h11 = t3 - t2;
        h00 * self.ys[k] + h10 * h * self.slopes[k] + h01 * self.ys[k + 1] + h11 * h * self.slopes[k + 1]
    }

    /// `count` evenly spaced `(x, y)` samples from the first to the last knot.
    pub fn sample(&self, count: usize) -> Vec<(f64, f64)> {
        let start = self.xs[0];
        let span = self.xs[self.xs.len() - 1] - start;
        match count {
            0 => Vec::new(),
            1 => vec![(start, self.evaluate(start))],
            _ => (0..count)
                .map(|i| {
                    let x = start + span * i as f64 / (count - 1) as f64;
                    (x, self.evaluate(x))
                })
                .collect(),
        }
    }

    pub fn slopes(&self) -> &[f64] {
        &self.slopes
    }
}

fn end_slope(h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let d = ((2.0 * h0 + h1) * d0 - h0 * d1) / (h0 + h1);
    if d.signum() != d0.signum() || d0 == 0.0 {
        0.0
    } else if d0.signum() != d1.signum() && d.abs() > 3.0 * d0.abs() {
        3.0 * d0
    } else {
        d
    }
}

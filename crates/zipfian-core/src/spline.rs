//! Interpolating cubic splines over integer knots.
//!
//! The knots are fixed at `x = 0, 1, ..., n-1`, which is all rank curves
//! need. The spline is stored as its second derivatives ("moments") at each
//! knot; each segment is then a cubic in the local offset `t = x - i`.
//!
//! With unit spacing the continuity conditions reduce to
//!
//! ```text
//! M[i-1] + 4 M[i] + M[i+1] = 6 (y[i+1] - 2 y[i] + y[i-1])    for 0 < i < n-1
//! ```
//!
//! and the boundary choice supplies the two missing equations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Minimum number of values for a cubic spline (degree + 1).
pub const MIN_POINTS: usize = 4;

/// End conditions for the spline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Boundary {
    /// Zero curvature at both ends.
    #[default]
    Natural,
    /// Third derivative continuous across the second and second-to-last
    /// knots, so the first two and last two segments share one cubic.
    NotAKnot,
}

impl Boundary {
    /// Returns the boundary name as used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Natural => "natural",
            Self::NotAKnot => "not-a-knot",
        }
    }
}

impl std::fmt::Display for Boundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fitted cubic spline passing through every input value.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    values: Vec<f64>,
    moments: Vec<f64>,
}

impl CubicSpline {
    /// Fit a spline through `values` placed at `x = 0..values.len()`.
    pub fn fit(values: &[f64], boundary: Boundary) -> AnalysisResult<Self> {
        let n = values.len();
        if n < MIN_POINTS {
            return Err(AnalysisError::InsufficientData {
                needed: MIN_POINTS,
                got: n,
            });
        }

        // Right-hand sides, indexed by knot; the ends are unused.
        let mut rhs = vec![0.0; n];
        for i in 1..n - 1 {
            rhs[i] = 6.0 * (values[i + 1] - 2.0 * values[i] + values[i - 1]);
        }

        let mut moments = vec![0.0; n];
        match boundary {
            Boundary::Natural => {
                solve_interior(&rhs, &mut moments, 1, n - 2);
            }
            Boundary::NotAKnot => {
                // Substituting M[0] = 2 M[1] - M[2] into the first interior
                // row leaves 6 M[1] = rhs[1]; the last row mirrors it.
                moments[1] = rhs[1] / 6.0;
                moments[n - 2] = rhs[n - 2] / 6.0;
                if n > MIN_POINTS {
                    solve_interior(&rhs, &mut moments, 2, n - 3);
                }
                moments[0] = 2.0f64.mul_add(moments[1], -moments[2]);
                moments[n - 1] = 2.0f64.mul_add(moments[n - 2], -moments[n - 3]);
            }
        }

        Ok(Self {
            values: values.to_vec(),
            moments,
        })
    }

    /// Number of knots.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`; a fitted spline has at least [`MIN_POINTS`] knots.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Evaluate at `x`. Values outside `[0, n-1]` extrapolate the end segments.
    pub fn evaluate(&self, x: f64) -> f64 {
        let last = self.values.len() - 2;
        let i = if x <= 0.0 {
            0
        } else {
            (x.floor() as usize).min(last)
        };
        let t = x - i as f64;
        let u = 1.0 - t;

        let (y0, y1) = (self.values[i], self.values[i + 1]);
        let (m0, m1) = (self.moments[i], self.moments[i + 1]);

        (m0 * u * u * u + m1 * t * t * t) / 6.0 + (y0 - m0 / 6.0) * u + (y1 - m1 / 6.0) * t
    }
}

/// Solve the tridiagonal rows `lo..=hi` for the moments in that range.
///
/// `moments[lo - 1]` and `moments[hi + 1]` must already hold their final
/// values; they are moved to the right-hand side. Uses the Thomas algorithm,
/// which is stable here because the matrix is strictly diagonally dominant.
fn solve_interior(rhs: &[f64], moments: &mut [f64], lo: usize, hi: usize) {
    let size = hi + 1 - lo;
    let mut c_prime = vec![0.0; size];
    let mut d_prime = vec![0.0; size];

    for k in 0..size {
        let i = lo + k;
        let mut d = rhs[i];
        if k == 0 {
            d -= moments[lo - 1];
        }
        if k == size - 1 {
            d -= moments[hi + 1];
        }

        if k == 0 {
            c_prime[k] = 1.0 / 4.0;
            d_prime[k] = d / 4.0;
        } else {
            let denom = 4.0 - c_prime[k - 1];
            c_prime[k] = 1.0 / denom;
            d_prime[k] = (d - d_prime[k - 1]) / denom;
        }
    }

    moments[hi] = d_prime[size - 1];
    for k in (0..size - 1).rev() {
        moments[lo + k] = d_prime[k] - c_prime[k] * moments[lo + k + 1];
    }
}

/// Piecewise-linear interpolation over integer knots.
///
/// Used for series too short for a cubic fit. Needs at least two values.
pub fn linear(values: &[f64], x: f64) -> f64 {
    let last = values.len() - 2;
    let i = if x <= 0.0 {
        0
    } else {
        (x.floor() as usize).min(last)
    };
    let t = x - i as f64;
    (values[i + 1] - values[i]).mul_add(t, values[i])
}

/// `count` evenly spaced samples from `start` to `end`, both inclusive.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| {
                    if i == count - 1 {
                        end
                    } else {
                        (i as f64).mul_add(step, start)
                    }
                })
                .collect()
        }
    }
}

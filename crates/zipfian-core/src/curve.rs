//! Curve smoothing and the Zipfian reference curve.
//!
//! A rank series is placed on `x = 0..n-1` and resampled at evenly spaced
//! points through a cubic spline, giving a dense curve for plotting.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::spline::{self, Boundary, CubicSpline};

/// Default number of samples in a smoothed curve.
pub const DEFAULT_SAMPLES: usize = 600;

/// Label given to the reference curve.
pub const ZIPF_LABEL: &str = "Zipfian Curve";

/// What to do with a series of two or three values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ShortSeriesPolicy {
    /// Report [`AnalysisError::InsufficientData`]; the caller skips the curve.
    #[default]
    Skip,
    /// Interpolate linearly between the points instead.
    Linear,
}

impl ShortSeriesPolicy {
    /// Returns the policy name as used in configuration.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Skip => "skip",
            Self::Linear => "linear",
        }
    }
}

/// How a curve is resampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SmoothingOptions {
    /// Number of evenly spaced samples.
    pub samples: usize,
    /// Spline end conditions.
    pub boundary: Boundary,
    /// Handling of series shorter than a cubic fit allows.
    pub short_series: ShortSeriesPolicy,
}

impl Default for SmoothingOptions {
    fn default() -> Self {
        Self {
            samples: DEFAULT_SAMPLES,
            boundary: Boundary::default(),
            short_series: ShortSeriesPolicy::default(),
        }
    }
}

/// How a curve's points were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    /// Cubic spline through every value.
    Cubic,
    /// Straight segments between values.
    Linear,
}

/// One sample of a smoothed curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CurvePoint {
    /// Position on the rank axis, 0-based.
    pub x: f64,
    /// Interpolated value.
    pub y: f64,
}

/// A densely sampled curve over `[0, n-1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SmoothedCurve {
    /// Interpolation used.
    pub interpolation: Interpolation,
    /// Samples in increasing `x`.
    pub points: Vec<CurvePoint>,
}

impl SmoothedCurve {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no samples.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample x-coordinates.
    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.x)
    }

    /// Sample y-coordinates.
    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.y)
    }
}

/// Smooth `values` into [`DEFAULT_SAMPLES`] points with a natural cubic spline.
///
/// Needs at least four values.
pub fn smooth(values: &[f64]) -> AnalysisResult<SmoothedCurve> {
    smooth_with(values, &SmoothingOptions::default())
}

/// Smooth `values` with explicit options.
#[tracing::instrument(skip(values), fields(len = values.len()))]
pub fn smooth_with(values: &[f64], options: &SmoothingOptions) -> AnalysisResult<SmoothedCurve> {
    let n = values.len();
    let x_max = n.saturating_sub(1) as f64;

    if n >= spline::MIN_POINTS {
        let fitted = CubicSpline::fit(values, options.boundary)?;
        let points = spline::linspace(0.0, x_max, options.samples)
            .into_iter()
            .map(|x| CurvePoint {
                x,
                y: fitted.evaluate(x),
            })
            .collect();
        return Ok(SmoothedCurve {
            interpolation: Interpolation::Cubic,
            points,
        });
    }

    match options.short_series {
        ShortSeriesPolicy::Linear if n >= 2 => {
            tracing::debug!(len = n, "falling back to linear interpolation");
            let points = spline::linspace(0.0, x_max, options.samples)
                .into_iter()
                .map(|x| CurvePoint {
                    x,
                    y: spline::linear(values, x),
                })
                .collect();
            Ok(SmoothedCurve {
                interpolation: Interpolation::Linear,
                points,
            })
        }
        ShortSeriesPolicy::Linear => Err(AnalysisError::InsufficientData { needed: 2, got: n }),
        ShortSeriesPolicy::Skip => Err(AnalysisError::InsufficientData {
            needed: spline::MIN_POINTS,
            got: n,
        }),
    }
}

/// The ideal Zipf series `100 / rank` for ranks `1..=depth`.
pub fn zipf_sequence(depth: usize) -> Vec<f64> {
    (1..=depth).map(|rank| 100.0 / rank as f64).collect()
}

/// Smooth the Zipf series for `depth` ranks.
pub fn zipf_reference(depth: usize, options: &SmoothingOptions) -> AnalysisResult<SmoothedCurve> {
    smooth_with(&zipf_sequence(depth), options)
}

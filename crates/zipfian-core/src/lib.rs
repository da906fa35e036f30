//! Core library for zipfian.
//!
//! Ranks the most frequent words of each document, expresses the ranking as
//! percentages of the top word, and smooths those percentages into dense
//! curves that can be drawn next to the ideal Zipfian curve.
//!
//! # Modules
//!
//! - [`document`] - Documents and UTF-8 decoding at the input boundary
//! - [`frequency`] - Normalization, counting, ranking, percentages
//! - [`spline`] - Interpolating cubic splines over integer knots
//! - [`curve`] - Curve smoothing and the Zipfian reference
//! - [`session`] - A batch run with per-document failure isolation
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use zipfian_core::session::{self, InputBlob, SessionOptions};
//!
//! let inputs = vec![InputBlob::new("cats.txt", "the cat sat on the mat the cat ran")];
//! let report = session::run(inputs, &SessionOptions::default()).unwrap();
//!
//! let cats = report.plotted().next().unwrap();
//! assert_eq!(cats.label, "cats [9 words]");
//! assert_eq!(cats.percentages, [100, 67, 33, 33, 33, 33]);
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod curve;
pub mod document;
pub mod error;
pub mod frequency;
pub mod session;
pub mod spline;

pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use curve::{ShortSeriesPolicy, SmoothedCurve, SmoothingOptions};
pub use document::Document;
pub use error::{AnalysisError, AnalysisResult, ConfigError, ConfigResult};
pub use session::{InputBlob, SessionOptions, SessionReport};
pub use spline::Boundary;

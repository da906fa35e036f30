//! Error types for zipfian-core.

use std::str::Utf8Error;

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A configuration value parsed but is outside its accepted range.
    #[error("invalid value for `{field}`: {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// An `include` glob pattern failed to compile.
    #[error("invalid include pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as written in the config.
        pattern: String,
        /// Underlying glob error.
        source: globset::Error,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during frequency analysis and curve smoothing.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Uploaded content is not valid UTF-8.
    #[error("{id}: content is not valid UTF-8: {source}")]
    Decode {
        /// Identifier of the document that failed to decode.
        id: String,
        /// Position and cause of the invalid byte sequence.
        source: Utf8Error,
    },

    /// Too few values to fit the requested interpolation.
    #[error("need at least {needed} values to interpolate, got {got}")]
    InsufficientData {
        /// Minimum number of values required.
        needed: usize,
        /// Number of values supplied.
        got: usize,
    },

    /// Depth must retain at least one ranked word.
    #[error("depth must be at least 1, got {0}")]
    InvalidDepth(usize),
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

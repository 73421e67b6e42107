//! Framework error types.
//!
//! Sub-crates define their own error enums and convert into `GlError` via
//! `From` impls where a caller needs one type, or wrap `ConfigError` as one of
//! their variants.

use std::time::Duration;

use thiserror::Error;

/// A rejected run configuration field.
///
/// Raised only while building a [`RunConfig`][crate::RunConfig]; a value of
/// that type is therefore always valid.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("message sizes must be positive (min {min}, max {max})")]
    ZeroMessageSize { min: usize, max: usize },

    #[error("min message size {min} exceeds max message size {max}")]
    SizeRangeInverted { min: usize, max: usize },

    #[error("message rate must be a finite positive number, got {0}")]
    InvalidRate(f64),

    #[error("emitters fraction must lie in (0, 1], got {0}")]
    InvalidEmittersFraction(f64),

    #[error("simulation time must be positive")]
    ZeroSimulationTime,

    #[error("simulation time {got:?} exceeds the maximum of {max:?}")]
    SimulationTimeTooLong { got: Duration, max: Duration },

    #[error("stddev divisor must be a finite positive number, got {0}")]
    InvalidStddevDivisor(f64),

    #[error("unknown {kind} distribution {name:?}")]
    UnknownDistribution { kind: &'static str, name: String },
}

/// The top-level error type for `gl-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum GlError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for all `gl-*` crates.
pub type GlResult<T> = Result<T, GlError>;

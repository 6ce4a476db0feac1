//! Error taxonomy for the analysis pipeline.
//!
//! Synchronous stages (data assignment, background estimation, extrapolation)
//! return `Result<_, CorfuncError>`. The absence of a structural signal is not an
//! error: the feature extractor reports it through `Extraction::NoSignal`.
//! Transform failures never cross the worker thread; the CLI turns a failed run
//! into `CorfuncError::Transform` after the fact.

use thiserror::Error;

/// Failures of the Guinier/Porod fits.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FittingError {
    #[error("{region} region has {found} point(s), at least {required} required")]
    InsufficientPoints {
        region: &'static str,
        found: usize,
        required: usize,
    },

    #[error("non-positive intensity {intensity} at q={q} in the Guinier region")]
    NonPositiveIntensity { q: f64, intensity: f64 },

    #[error("{model} fit did not converge after {iterations} iterations")]
    NotConverged { model: &'static str, iterations: usize },

    #[error("{model} fit is singular or produced non-finite parameters")]
    Singular { model: &'static str },
}

/// Top-level error type.
#[derive(Debug, Clone, Error)]
pub enum CorfuncError {
    #[error("invalid data: {0}")]
    Validation(String),

    #[error("fit failed: {0}")]
    Fitting(#[from] FittingError),

    #[error("transform failed: {0}")]
    Transform(String),

    #[error("no structural signal found: {0}")]
    NoSignal(String),

    #[error("output error: {0}")]
    Output(String),
}

impl CorfuncError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Process exit code used by the `corfunc` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            CorfuncError::Validation(_) => 2,
            CorfuncError::Fitting(_) => 3,
            CorfuncError::Transform(_) => 4,
            CorfuncError::NoSignal(_) => 5,
            CorfuncError::Output(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CorfuncError>;

//! Real-space transforms of the extrapolated intensity.
//!
//! - [`compute`]: the Fourier and Hilbert numerics
//! - [`engine`]: the cancellable background job that runs them

pub mod compute;
pub mod engine;

use std::fmt;

use thiserror::Error;

pub use compute::TransformInput;
pub use engine::TransformJob;

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStage {
    Preparing,
    CorrelationFunction,
    ThreeDimensional,
    InterfaceDistribution,
    Finished,
}

impl fmt::Display for TransformStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransformStage::Preparing => "preparing",
            TransformStage::CorrelationFunction => "gamma_1",
            TransformStage::ThreeDimensional => "gamma_3",
            TransformStage::InterfaceDistribution => "idf",
            TransformStage::Finished => "done",
        };
        f.write_str(label)
    }
}

/// Messages a running transform sends to its observer.
#[derive(Debug, Clone, PartialEq)]
pub enum TransformUpdate {
    Progress { stage: TransformStage, percent: f64 },
    /// The run ended without a result.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    #[error("transform cancelled")]
    Cancelled,

    #[error("need at least two extrapolated points, got {0}")]
    TooShort(usize),

    #[error("correlation function is identically zero and cannot be normalized")]
    ZeroNormalization,

    #[error("non-finite values while computing {0}")]
    NonFinite(TransformStage),
}

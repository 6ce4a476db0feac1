//! Reporting: the machine-readable run summary and its text rendering.

pub mod format;

use serde::Serialize;

use crate::app::pipeline::RunOutput;
use crate::domain::{ExtractedParameters, FitParameters, SupplementaryParameters, TransformKind};
use crate::extract::Extraction;

pub use format::format_run_summary;

/// What `corfunc analyze --json` prints.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub transform: TransformKind,
    pub points: usize,
    pub q_range: (f64, f64),
    pub background: f64,
    pub fit: FitParameters,
    pub extrapolated_points: usize,
    pub parameters: Option<ExtractedParameters>,
    pub supplementary: Option<SupplementaryParameters>,
    /// Set when no structural parameters could be extracted.
    pub no_signal: Option<String>,
}

impl RunReport {
    pub fn from_run(run: &RunOutput) -> Self {
        let (parameters, supplementary, no_signal) = match &run.extraction {
            Extraction::Found(p, s) => (Some(*p), Some(*s), None),
            Extraction::NoSignal(reason) => (None, None, Some(reason.to_string())),
        };
        Self {
            transform: run.transformed.kind,
            points: run.data.len(),
            q_range: run.transformed.q_range,
            background: run.background,
            fit: run.extrapolation.params,
            extrapolated_points: run.extrapolation.curve.len(),
            parameters,
            supplementary,
            no_signal,
        }
    }
}

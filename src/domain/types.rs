//! Shared domain types.
//!
//! Every stage of the pipeline consumes these values by reference and produces
//! fresh ones; nothing here is mutated after construction.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{CorfuncError, Result};

/// An ordered `(x, y, dy?)` series: intensity vs. q, or a transform vs. distance.
///
/// Invariants (checked by [`Curve::new`]): non-empty, equal column lengths,
/// finite values, `x` strictly increasing, `dy >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    x: Vec<f64>,
    y: Vec<f64>,
    dy: Option<Vec<f64>>,
}

impl Curve {
    pub fn new(x: Vec<f64>, y: Vec<f64>, dy: Option<Vec<f64>>) -> Result<Self> {
        if x.is_empty() {
            return Err(CorfuncError::validation("curve has no points"));
        }
        if x.len() != y.len() {
            return Err(CorfuncError::validation(format!(
                "x and y lengths differ ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        if let Some(i) = x.iter().chain(y.iter()).position(|v| !v.is_finite()) {
            return Err(CorfuncError::validation(format!(
                "non-finite value at flat index {i}"
            )));
        }
        if let Some(i) = x.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CorfuncError::validation(format!(
                "x is not strictly increasing at index {}",
                i + 1
            )));
        }
        if let Some(dy) = &dy {
            if dy.len() != x.len() {
                return Err(CorfuncError::validation(format!(
                    "dy length {} does not match x length {}",
                    dy.len(),
                    x.len()
                )));
            }
            if dy.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(CorfuncError::validation("dy must be finite and non-negative"));
            }
        }
        Ok(Self { x, y, dy })
    }

    /// Build a curve from samples produced internally (transform output, grids).
    ///
    /// Skips validation; callers guarantee the invariants by construction.
    pub(crate) fn from_parts(x: Vec<f64>, y: Vec<f64>) -> Self {
        debug_assert_eq!(x.len(), y.len());
        Self { x, y, dy: None }
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn dy(&self) -> Option<&[f64]> {
        self.dy.as_deref()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x_min(&self) -> f64 {
        self.x[0]
    }

    pub fn x_max(&self) -> f64 {
        self.x[self.x.len() - 1]
    }

    /// Points whose `x` satisfies `keep`, as parallel `(x, y)` vectors.
    pub fn select(&self, keep: impl Fn(f64) -> bool) -> (Vec<f64>, Vec<f64>) {
        self.x
            .iter()
            .zip(self.y.iter())
            .filter(|(x, _)| keep(**x))
            .map(|(&x, &y)| (x, y))
            .unzip()
    }
}

/// The five boundaries splitting a measured curve into fit regions.
///
/// - Guinier region: `qmin < q < lowerq`
/// - Porod region: `upperq_lo <= q <= upperq_hi`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtrapolationParameters {
    pub qmin: f64,
    pub lowerq: f64,
    pub upperq_lo: f64,
    pub upperq_hi: f64,
    pub qmax: f64,
}

impl ExtrapolationParameters {
    pub fn upperq(&self) -> (f64, f64) {
        (self.upperq_lo, self.upperq_hi)
    }

    /// Check `qmin < lowerq <= upperq_lo < upperq_hi <= qmax`.
    ///
    /// The calculator trusts its caller; front-ends call this before running.
    pub fn validate(&self) -> Result<()> {
        let ordered = self.qmin < self.lowerq
            && self.lowerq <= self.upperq_lo
            && self.upperq_lo < self.upperq_hi
            && self.upperq_hi <= self.qmax;
        if ordered {
            Ok(())
        } else {
            Err(CorfuncError::validation(format!(
                "boundaries must satisfy qmin < lowerq <= upperq_lo < upperq_hi <= qmax, got \
                 {:.5} / {:.5} / {:.5} / {:.5} / {:.5}",
                self.qmin, self.lowerq, self.upperq_lo, self.upperq_hi, self.qmax
            )))
        }
    }
}

/// `I(q) = background + K·q⁻⁴·exp(−q²σ²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PorodFitResult {
    pub k: f64,
    pub sigma: f64,
    pub background: f64,
}

/// `I(q) = exp(A + B·q²)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GuinierFitResult {
    pub a: f64,
    pub b: f64,
}

/// Tail-model parameters reported by the extrapolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParameters {
    #[serde(rename = "A")]
    pub a: f64,
    #[serde(rename = "B")]
    pub b: f64,
    #[serde(rename = "K")]
    pub k: f64,
    pub sigma: f64,
}

/// Which integral transform turns the extrapolated curve into real space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    Fourier,
    Hilbert,
}

impl TransformKind {
    pub fn display_name(self) -> &'static str {
        match self {
            TransformKind::Fourier => "Fourier",
            TransformKind::Hilbert => "Hilbert",
        }
    }
}

/// Output of one transform run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedData {
    /// 1-D correlation function.
    pub gamma_1: Curve,
    /// 3-D correlation function (running mean of `gamma_1`).
    pub gamma_3: Curve,
    /// Interface distribution function.
    pub idf: Curve,
    /// Measured `(qmin, qmax)` the transform was computed from.
    pub q_range: (f64, f64),
    pub kind: TransformKind,
}

/// Geometry for plotting the tangent construction. Not used downstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupplementaryParameters {
    pub tangent_point_x: f64,
    pub tangent_point_y: f64,
    pub tangent_gradient: f64,
    pub first_minimum_x: f64,
    pub first_minimum_y: f64,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
}

impl SupplementaryParameters {
    pub fn tangent_intercept(&self) -> f64 {
        self.tangent_point_y - self.tangent_gradient * self.tangent_point_x
    }
}

/// Structural parameters read off the correlation function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExtractedParameters {
    pub long_period: f64,
    pub interface_thickness: f64,
    pub hard_block_thickness: f64,
    pub soft_block_thickness: f64,
    pub core_thickness: f64,
    pub polydispersity_ryan: f64,
    pub polydispersity_stribeck: f64,
    pub local_crystallinity: f64,
}

/// Parameters of the synthetic lamellar sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSpec {
    /// Injected long period (same length unit as `1/q`).
    pub long_period: f64,
    /// Gaussian width of the Lorentz-corrected peak, as a fraction of `q* = 2π/L`.
    pub peak_width: f64,
    pub peak_amplitude: f64,
    pub porod_k: f64,
    pub porod_sigma: f64,
    pub background: f64,
    pub q_min: f64,
    pub q_max: f64,
    pub n_points: usize,
    /// Relative (multiplicative) Gaussian noise; 0 disables noise.
    pub noise: f64,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            long_period: 100.0,
            peak_width: 0.1,
            peak_amplitude: 1.0,
            porod_k: 1e-6,
            porod_sigma: 3.0,
            background: 1e-4,
            q_min: 0.005,
            q_max: 0.3,
            n_points: 591,
            noise: 0.0,
            seed: 42,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// Derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub sample: SampleSpec,
    pub lowerq: f64,
    pub upperq: (f64, f64),
    pub scale: f64,
    pub transform: TransformKind,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub json: bool,
    pub progress: bool,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(CorfuncError::validation(format!(
                "scale must be positive, got {}",
                self.scale
            )));
        }
        ExtrapolationParameters {
            qmin: self.sample.q_min,
            lowerq: self.lowerq,
            upperq_lo: self.upperq.0,
            upperq_hi: self.upperq.1,
            qmax: self.sample.q_max,
        }
        .validate()
    }
}

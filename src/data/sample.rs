//! Synthetic lamellar-stack scattering curves.
//!
//! The intensity is the sum of three contributions:
//!
//! ```text
//! I(q) = bg + K·q⁻⁴·exp(−q²σ²) + A·exp(−(q − q*)² / 2w²) / q²
//! ```
//!
//! - a flat background,
//! - a Porod term for the sharp lamellar interfaces,
//! - a Lorentz-corrected Bragg peak at `q* = 2π/L`. Its cosine transform is a
//!   damped cosine whose first maximum sits at the long period `L`
//!   (shifted by about `(w/q*)²`).

use std::f64::consts::PI;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Curve, SampleSpec};
use crate::error::{CorfuncError, Result};

/// Noise-free intensity of the sample model at `q`.
pub fn lamellar_intensity(spec: &SampleSpec, q: f64) -> f64 {
    let q_star = 2.0 * PI / spec.long_period;
    let w = spec.peak_width * q_star;
    let porod = spec.porod_k * q.powi(-4) * (-(q * q) * spec.porod_sigma * spec.porod_sigma).exp();
    let peak = spec.peak_amplitude * (-(q - q_star).powi(2) / (2.0 * w * w)).exp() / (q * q);
    spec.background + porod + peak
}

/// Sample the model on `n_points` uniformly spaced q values.
///
/// With `noise > 0` each intensity is multiplied by `1 + noise·N(0, 1)` and
/// `dy = noise·I`; without noise `dy` is left unset.
pub fn generate_sample(spec: &SampleSpec) -> Result<Curve> {
    if spec.n_points < 2 {
        return Err(CorfuncError::validation("sample needs at least two points"));
    }
    if !(spec.q_min > 0.0 && spec.q_max > spec.q_min) {
        return Err(CorfuncError::validation(format!(
            "invalid sample q range [{}, {}]",
            spec.q_min, spec.q_max
        )));
    }
    if !(spec.long_period > 0.0 && spec.peak_width > 0.0) {
        return Err(CorfuncError::validation("long period and peak width must be positive"));
    }
    if !(spec.noise >= 0.0 && spec.noise.is_finite()) {
        return Err(CorfuncError::validation("noise level must be a finite non-negative number"));
    }

    let dq = (spec.q_max - spec.q_min) / (spec.n_points - 1) as f64;
    let q: Vec<f64> = (0..spec.n_points).map(|i| spec.q_min + i as f64 * dq).collect();
    let clean: Vec<f64> = q.iter().map(|&v| lamellar_intensity(spec, v)).collect();

    if spec.noise == 0.0 {
        return Curve::new(q, clean, None);
    }

    let mut rng = StdRng::seed_from_u64(spec.seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| CorfuncError::validation(format!("noise distribution error: {e}")))?;

    let noisy: Vec<f64> = clean
        .iter()
        .map(|&i| i * (1.0 + spec.noise * normal.sample(&mut rng)))
        .collect();
    let dy: Vec<f64> = clean.iter().map(|&i| spec.noise * i.abs()).collect();

    Curve::new(q, noisy, Some(dy))
}

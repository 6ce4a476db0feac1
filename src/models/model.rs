//! Tail models for the scattering curve.
//!
//! - Porod: `I(q) = bg + K·q⁻⁴·exp(−q²σ²)` (sharp interfaces, high q)
//! - Guinier: `I(q) = exp(A + B·q²)` (low q)
//!
//! The fitted result types evaluate directly as [`Function1d`]s so they can
//! be fed to `SmoothJoin`.

use crate::domain::{GuinierFitResult, PorodFitResult};
use crate::math::Function1d;
use crate::math::lm::LeastSquaresModel;

pub fn porod(q: f64, k: f64, sigma: f64, background: f64) -> f64 {
    background + k * q.powi(-4) * (-(q * q) * sigma * sigma).exp()
}

pub fn guinier(q: f64, a: f64, b: f64) -> f64 {
    (a + b * q * q).exp()
}

impl Function1d for PorodFitResult {
    fn eval(&self, q: f64) -> f64 {
        porod(q, self.k, self.sigma, self.background)
    }
}

impl Function1d for GuinierFitResult {
    fn eval(&self, q: f64) -> f64 {
        guinier(q, self.a, self.b)
    }
}

/// The Porod law multiplied by `q²`, parameters `[K, σ, bg]`.
///
/// Fitting `I·q²` instead of `I` keeps the residuals of the steep low-q end
/// of the Porod window from swamping those at high q.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorodQ2;

impl LeastSquaresModel for PorodQ2 {
    fn n_params(&self) -> usize {
        3
    }

    fn value(&self, q: f64, p: &[f64]) -> f64 {
        porod(q, p[0], p[1], p[2]) * q * q
    }

    fn gradient(&self, q: f64, p: &[f64], out: &mut [f64]) {
        let (k, sigma) = (p[0], p[1]);
        let q2 = q * q;
        let damping = (-q2 * sigma * sigma).exp();
        out[0] = damping / q2;
        out[1] = -2.0 * k * sigma * damping;
        out[2] = q2;
    }
}

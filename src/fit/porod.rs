//! Porod-law fit of the high-q tail.
//!
//! We fit `I·q² = (bg + K·q⁻⁴·exp(−q²σ²))·q²` with bounds
//! `K ∈ ℝ, σ >= 0, bg ∈ ℝ` (negative backgrounds from over-subtracted data are
//! legitimate).
//!
//! Starting point: at `σ = 0` the model is linear in `(K, bg)`, so we solve that
//! by least squares first. The σ = 0 solution is also kept as a candidate: the
//! σ-gradient vanishes at σ = 0, so LM cannot reach that corner from inside.

use tracing::debug;

use crate::domain::PorodFitResult;
use crate::error::FittingError;
use crate::math::fit_columns;
use crate::math::lm::{LeastSquaresModel, LmFailure, LmOptions, minimize};
use crate::models::PorodQ2;

/// Three parameters need at least three points.
pub const POROD_MIN_POINTS: usize = 3;

pub fn fit_porod(q: &[f64], iq: &[f64]) -> Result<PorodFitResult, FittingError> {
    if q.len() < POROD_MIN_POINTS {
        return Err(FittingError::InsufficientPoints {
            region: "Porod",
            found: q.len(),
            required: POROD_MIN_POINTS,
        });
    }

    let y: Vec<f64> = q.iter().zip(iq.iter()).map(|(q, i)| i * q * q).collect();

    // σ = 0: y = K·q⁻² + bg·q²
    let inv_q2: Vec<f64> = q.iter().map(|v| 1.0 / (v * v)).collect();
    let q2: Vec<f64> = q.iter().map(|v| v * v).collect();
    let linear = fit_columns(&[inv_q2, q2], &y).ok_or(FittingError::Singular { model: "Porod" })?;
    let (k0, bg0) = (linear[0], linear[1]);
    let linear_sse = sse(q, &y, &[k0, 0.0, bg0]);

    let q_mid = q[q.len() / 2];
    let sigma0 = 0.5 / q_mid;

    let opts = LmOptions::unbounded(3).with_bounds(
        vec![f64::NEG_INFINITY, 0.0, f64::NEG_INFINITY],
        vec![f64::INFINITY; 3],
    );
    let report = minimize(&PorodQ2, q, &y, &[k0, sigma0, bg0], &opts).map_err(|e| match e {
        LmFailure::MaxIterations(iterations) => {
            FittingError::NotConverged { model: "Porod", iterations }
        }
        LmFailure::NonFinite => FittingError::Singular { model: "Porod" },
    })?;

    debug!(
        k = report.params[0],
        sigma = report.params[1],
        bg = report.params[2],
        sse = report.sse,
        linear_sse,
        iterations = report.iterations,
        "Porod fit"
    );

    let params = if linear_sse < report.sse {
        [k0, 0.0, bg0]
    } else {
        [report.params[0], report.params[1], report.params[2]]
    };

    Ok(PorodFitResult {
        k: params[0],
        sigma: params[1],
        background: params[2],
    })
}

fn sse(q: &[f64], y: &[f64], p: &[f64]) -> f64 {
    q.iter()
        .zip(y.iter())
        .map(|(&qi, &yi)| (yi - PorodQ2.value(qi, p)).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::porod;

    fn synth(k: f64, sigma: f64, bg: f64) -> (Vec<f64>, Vec<f64>) {
        let q: Vec<f64> = (0..60).map(|i| 0.1 + i as f64 * 0.2 / 59.0).collect();
        let iq = q.iter().map(|&v| porod(v, k, sigma, bg)).collect();
        (q, iq)
    }

    fn rel(a: f64, b: f64) -> f64 {
        ((a - b) / b).abs()
    }

    #[test]
    fn recovers_parameters_of_noiseless_tail() {
        let (q, iq) = synth(2e-4, 3.0, 0.05);
        let fit = fit_porod(&q, &iq).unwrap();
        assert!(rel(fit.k, 2e-4) < 0.01, "{fit:?}");
        assert!(rel(fit.sigma, 3.0) < 0.01, "{fit:?}");
        assert!(rel(fit.background, 0.05) < 0.01, "{fit:?}");
    }

    #[test]
    fn handles_negative_background() {
        let (q, iq) = synth(2e-4, 3.0, -0.01);
        let fit = fit_porod(&q, &iq).unwrap();
        assert!(rel(fit.background, -0.01) < 0.01, "{fit:?}");
    }

    #[test]
    fn undamped_tail_keeps_sigma_at_zero() {
        let (q, iq) = synth(1e-4, 0.0, 0.02);
        let fit = fit_porod(&q, &iq).unwrap();
        assert!(fit.sigma.abs() < 1e-3, "{fit:?}");
        assert!(rel(fit.k, 1e-4) < 0.01, "{fit:?}");
    }

    #[test]
    fn too_few_points_is_an_error() {
        let err = fit_porod(&[0.1, 0.2], &[1.0, 0.5]).unwrap_err();
        assert_eq!(
            err,
            FittingError::InsufficientPoints { region: "Porod", found: 2, required: 3 }
        );
    }
}

//! Guinier fit of the low-q end: `ln I = A + B·q²`, solved by SVD least squares.

use tracing::debug;

use crate::domain::GuinierFitResult;
use crate::error::FittingError;
use crate::math::fit_columns;

pub const GUINIER_MIN_POINTS: usize = 2;

pub fn fit_guinier(q: &[f64], iq: &[f64]) -> Result<GuinierFitResult, FittingError> {
    if q.len() < GUINIER_MIN_POINTS {
        return Err(FittingError::InsufficientPoints {
            region: "Guinier",
            found: q.len(),
            required: GUINIER_MIN_POINTS,
        });
    }
    if let Some((&q_bad, &i_bad)) = q.iter().zip(iq.iter()).find(|(_, i)| **i <= 0.0) {
        return Err(FittingError::NonPositiveIntensity { q: q_bad, intensity: i_bad });
    }

    let q2: Vec<f64> = q.iter().map(|v| v * v).collect();
    let ln_i: Vec<f64> = iq.iter().map(|v| v.ln()).collect();
    let beta = fit_columns(&[q2, vec![1.0; q.len()]], &ln_i)
        .ok_or(FittingError::Singular { model: "Guinier" })?;

    let fit = GuinierFitResult { a: beta[1], b: beta[0] };
    debug!(a = fit.a, b = fit.b, n = q.len(), "Guinier fit");
    if fit.b > 0.0 {
        debug!("Guinier slope is positive; low-q extrapolation will rise towards q = 0");
    }
    Ok(fit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::guinier;

    #[test]
    fn recovers_guinier_parameters() {
        // Rg = 30 → B = −Rg²/3 = −300
        let q: Vec<f64> = (1..=25).map(|i| i as f64 * 0.002).collect();
        let iq: Vec<f64> = q.iter().map(|&v| guinier(v, 2.5, -300.0)).collect();
        let fit = fit_guinier(&q, &iq).unwrap();
        assert!((fit.a - 2.5).abs() < 1e-9, "{fit:?}");
        assert!((fit.b + 300.0).abs() < 1e-6, "{fit:?}");
    }

    #[test]
    fn rejects_non_positive_intensity() {
        let err = fit_guinier(&[0.01, 0.02, 0.03], &[1.0, 0.0, 0.5]).unwrap_err();
        assert_eq!(err, FittingError::NonPositiveIntensity { q: 0.02, intensity: 0.0 });
    }

    #[test]
    fn needs_two_points() {
        assert!(matches!(
            fit_guinier(&[0.01], &[1.0]),
            Err(FittingError::InsufficientPoints { found: 1, .. })
        ));
    }
}

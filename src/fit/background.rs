//! Flat background level from the Porod window.

use tracing::debug;

use crate::domain::Curve;
use crate::error::Result;
use crate::fit::porod::fit_porod;
use crate::fit::regions::porod_region;

/// Fit the Porod law over `upperq` and return its constant term.
pub fn estimate_background(data: &Curve, upperq: (f64, f64)) -> Result<f64> {
    let (q, iq) = porod_region(data, upperq);
    let fit = fit_porod(&q, &iq)?;
    debug!(background = fit.background, lo = upperq.0, hi = upperq.1, "background estimated");
    Ok(fit.background)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CorfuncError, FittingError};
    use crate::models::porod;

    #[test]
    fn background_of_synthetic_tail() {
        let q: Vec<f64> = (0..200).map(|i| 0.01 + i as f64 * 0.0015).collect();
        let iq: Vec<f64> = q.iter().map(|&v| porod(v, 3e-5, 2.0, 0.02)).collect();
        let data = Curve::new(q, iq, None).unwrap();
        let bg = estimate_background(&data, (0.15, 0.3)).unwrap();
        assert!((bg - 0.02).abs() < 2e-4, "bg = {bg}");
    }

    #[test]
    fn empty_window_propagates_fitting_error() {
        let data = Curve::new(vec![0.1, 0.2, 0.3], vec![3.0, 2.0, 1.0], None).unwrap();
        let err = estimate_background(&data, (0.5, 0.6)).unwrap_err();
        assert!(matches!(
            err,
            CorfuncError::Fitting(FittingError::InsufficientPoints { found: 0, .. })
        ));
    }
}

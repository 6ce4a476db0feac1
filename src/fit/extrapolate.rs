//! Extrapolation of the measured curve to `q → 0` and `q → ∞`.
//!
//! Pipeline:
//!
//! 1. Porod fit over `[upperq_lo, upperq_hi]` (K, σ; the background is the
//!    calculator's stored value)
//! 2. `s1 = join(linear interpolation of data, Porod law, [upperq_lo, qmax])`
//! 3. Guinier fit over `0 < q < lowerq`
//! 4. `s2 = join(Guinier law, s1, [qmin, lowerq])`
//!
//! `s2` is then sampled on `0, dq, 2dq, …` up to `100·qmax`, where `dq` is the
//! spacing of the first two measured points.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::{Curve, FitParameters, GuinierFitResult, PorodFitResult};
use crate::error::{CorfuncError, Result};
use crate::fit::guinier::fit_guinier;
use crate::fit::porod::fit_porod;
use crate::fit::regions::{guinier_region, porod_region};
use crate::math::{Function1d, LinearInterpolator, SmoothJoin};

/// The extrapolated curve is sampled out to this multiple of the measured `qmax`.
pub const EXTRAPOLATION_FACTOR: f64 = 100.0;

/// Data joined into the Porod law at high q.
pub type HighQJoin = SmoothJoin<LinearInterpolator, PorodFitResult>;

/// Guinier law joined into [`HighQJoin`] at low q.
pub type ExtrapolatedIntensity = SmoothJoin<GuinierFitResult, HighQJoin>;

/// Output of [`extrapolate`].
#[derive(Debug, Clone)]
pub struct Extrapolation {
    pub params: FitParameters,
    pub porod: PorodFitResult,
    pub guinier: GuinierFitResult,
    /// `s2` sampled on the extrapolation grid.
    pub curve: Curve,
    /// `s2` itself.
    pub function: ExtrapolatedIntensity,
}

/// Fit both tails and build the extrapolated intensity.
pub fn extrapolate(
    data: &Curve,
    lowerq: f64,
    upperq: (f64, f64),
    background: f64,
) -> Result<Extrapolation> {
    if data.len() < 2 {
        return Err(CorfuncError::validation("extrapolation needs at least two measured points"));
    }
    let q = data.x();
    let iq = data.y();

    let (pq, piq) = porod_region(data, upperq);
    let porod_fit = fit_porod(&pq, &piq)?;
    let porod = PorodFitResult {
        background,
        ..porod_fit
    };

    let s1 = SmoothJoin::new(LinearInterpolator::new(q, iq), porod, upperq.0, data.x_max());

    let (gq, giq) = guinier_region(data, lowerq);
    let guinier = fit_guinier(&gq, &giq)?;

    let high_q_join = s1.transition();
    let s2 = SmoothJoin::new(guinier, s1, data.x_min(), lowerq);

    let params = FitParameters {
        a: guinier.a,
        b: guinier.b,
        k: porod.k,
        sigma: porod.sigma,
    };
    debug!(
        ?params,
        background,
        ?high_q_join,
        low_q_join = ?s2.transition(),
        "tail fits complete"
    );

    let dq = q[1] - q[0];
    let grid = extrapolation_grid(data.x_max(), dq);
    let values: Vec<f64> = grid.par_iter().map(|&v| s2.eval(v)).collect();

    info!(
        points = grid.len(),
        q_end = EXTRAPOLATION_FACTOR * data.x_max(),
        "extrapolated curve sampled"
    );

    Ok(Extrapolation {
        params,
        porod,
        guinier,
        curve: Curve::from_parts(grid, values),
        function: s2,
    })
}

/// `0, dq, 2dq, …` strictly below `EXTRAPOLATION_FACTOR · qmax`.
pub fn extrapolation_grid(qmax: f64, dq: f64) -> Vec<f64> {
    let stop = EXTRAPOLATION_FACTOR * qmax;
    let n = (stop / dq).ceil() as usize;
    (0..n).map(|i| i as f64 * dq).collect()
}

//! Structural parameters from the shape of the 1-D correlation function.
//!
//! The construction follows the lamellar-morphology model: the first maximum of
//! `Γ₁` gives the long period, the tangent through the inflection point (where
//! the IDF changes sign) meets the level of the first minimum at the hard-block
//! thickness, and the stretch over which `Γ₁` stays within 1% of that tangent
//! bounds the interface and core thicknesses.
//!
//! Absence of these features is an expected outcome for some data and is
//! reported as [`Extraction::NoSignal`], never as an error or a panic.

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{ExtractedParameters, SupplementaryParameters, TransformedData};
use crate::math::calculus::{central_difference, local_maxima, local_minima, mean};

/// Half-width (in samples) of the window the tangent slope is averaged over.
pub const TANGENT_HALF_WIDTH: usize = 40;

/// Relative deviation from the tangent still counted as "linear".
pub const LINEAR_TOLERANCE: f64 = 0.01;

/// Why no parameters could be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Degeneracy {
    #[error("correlation function has no local maximum")]
    NoMaximum,
    #[error("correlation function has no local minimum")]
    NoMinimum,
    #[error("interface distribution function never changes sign")]
    NoInflection,
    #[error("no samples available to estimate the tangent slope")]
    EmptyTangentWindow,
    #[error("tangent at the inflection point is flat")]
    ZeroSlope,
    #[error("no part of the correlation function follows the tangent")]
    NoLinearRegion,
    #[error("division by zero in the derived parameters")]
    ZeroDivisor,
    #[error("derived parameters are not finite")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    Found(ExtractedParameters, SupplementaryParameters),
    NoSignal(Degeneracy),
}

impl Extraction {
    pub fn ok(self) -> Option<(ExtractedParameters, SupplementaryParameters)> {
        match self {
            Extraction::Found(params, supplementary) => Some((params, supplementary)),
            Extraction::NoSignal(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Extraction::Found(..))
    }
}

pub fn extract_parameters(data: &TransformedData) -> Extraction {
    match try_extract(data) {
        Ok((params, supplementary)) => {
            debug!(?params, "structural parameters extracted");
            Extraction::Found(params, supplementary)
        }
        Err(reason) => {
            warn!(%reason, "no structural signal in correlation function");
            Extraction::NoSignal(reason)
        }
    }
}

fn try_extract(
    data: &TransformedData,
) -> Result<(ExtractedParameters, SupplementaryParameters), Degeneracy> {
    let x = data.gamma_1.x();
    let y = data.gamma_1.y();

    let first_max = *local_maxima(y).first().ok_or(Degeneracy::NoMaximum)?;
    let first_min = *local_minima(y).first().ok_or(Degeneracy::NoMinimum)?;
    let long_period = x[first_max];
    let gamma_min = y[first_min];

    // dy[i] is the derivative at sample i + 1.
    let dy = central_difference(x, y);

    // Sign change of the IDF, skipping its DC sample.
    let idf = data.idf.y();
    let above: Vec<bool> = idf.iter().skip(1).map(|&v| v > 0.0).collect();
    let crossing = above
        .windows(2)
        .position(|w| w[0] != w[1])
        .ok_or(Degeneracy::NoInflection)?;
    let inflection = crossing + 1;

    let (lo, hi) = tangent_window(inflection, dy.len());
    let slope = mean(&dy[lo..hi]).ok_or(Degeneracy::EmptyTangentWindow)?;
    if slope == 0.0 {
        return Err(Degeneracy::ZeroSlope);
    }

    let (tx, ty) = match (x.get(inflection + 1), y.get(inflection + 1)) {
        (Some(&tx), Some(&ty)) if inflection < dy.len() => (tx, ty),
        _ => return Err(Degeneracy::EmptyTangentWindow),
    };
    let intercept = ty - slope * tx;

    let hard_block_thickness = (gamma_min - intercept) / slope;
    let soft_block_thickness = long_period - hard_block_thickness;

    let linear: Vec<usize> = (0..x.len())
        .filter(|&i| ((y[i] - (slope * x[i] + intercept)) / y[i]).abs() < LINEAR_TOLERANCE)
        .collect();
    let (first_linear, last_linear) = match (linear.first(), linear.last()) {
        (Some(&a), Some(&b)) => (a, b),
        _ => return Err(Degeneracy::NoLinearRegion),
    };
    let interface_thickness = x[first_linear];
    let core_thickness = x[last_linear];
    let gamma_max = y[last_linear];

    if long_period == 0.0 || gamma_max == 0.0 {
        return Err(Degeneracy::ZeroDivisor);
    }
    let local_crystallinity = hard_block_thickness / long_period;
    if local_crystallinity == 1.0 {
        return Err(Degeneracy::ZeroDivisor);
    }

    let params = ExtractedParameters {
        long_period,
        interface_thickness,
        hard_block_thickness,
        soft_block_thickness,
        core_thickness,
        polydispersity_ryan: (gamma_min / gamma_max).abs(),
        polydispersity_stribeck: (local_crystallinity / ((local_crystallinity - 1.0) * gamma_max))
            .abs(),
        local_crystallinity,
    };

    let finite = [
        params.long_period,
        params.interface_thickness,
        params.hard_block_thickness,
        params.soft_block_thickness,
        params.core_thickness,
        params.polydispersity_ryan,
        params.polydispersity_stribeck,
        params.local_crystallinity,
        slope,
        intercept,
    ]
    .iter()
    .all(|v| v.is_finite());
    if !finite {
        return Err(Degeneracy::NonFinite);
    }

    let (y_min, y_max) = y
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let (q_lo, q_hi) = data.q_range;

    let supplementary = SupplementaryParameters {
        tangent_point_x: tx,
        tangent_point_y: ty,
        tangent_gradient: slope,
        first_minimum_x: x[first_min],
        first_minimum_y: gamma_min,
        x_range: (1.0 / q_hi, 1.0 / q_lo),
        y_range: (y_min, y_max),
    };

    Ok((params, supplementary))
}

/// Index range `[lo, hi)` of `dy` averaged for the tangent slope at `center`.
///
/// Normally `center ± 40`; near the start the window shrinks to `[0, 2·center)`,
/// near the end it becomes `[2·center − len, len)`, and it never runs past `len`.
fn tangent_window(center: usize, len: usize) -> (usize, usize) {
    let (lo, hi) = if center < TANGENT_HALF_WIDTH {
        (0, 2 * center)
    } else if center + TANGENT_HALF_WIDTH > len {
        ((2 * center).saturating_sub(len), len)
    } else {
        (center - TANGENT_HALF_WIDTH, center + TANGENT_HALF_WIDTH)
    };
    let hi = hi.min(len);
    (lo.min(hi), hi)
}

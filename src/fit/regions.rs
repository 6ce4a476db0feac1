//! Selection of the fit windows.
//!
//! One convention everywhere: the Porod window is closed on both ends,
//! `upperq_lo <= q <= upperq_hi`, for background estimation and extrapolation
//! alike. The Guinier window is open, `0 < q < lowerq`.

use crate::domain::Curve;

pub fn porod_region(data: &Curve, upperq: (f64, f64)) -> (Vec<f64>, Vec<f64>) {
    let (lo, hi) = upperq;
    data.select(|q| q >= lo && q <= hi)
}

pub fn guinier_region(data: &Curve, lowerq: f64) -> (Vec<f64>, Vec<f64>) {
    data.select(|q| q > 0.0 && q < lowerq)
}

//! The transform numerics, run on the worker thread.
//!
//! Fourier (cosine) transform, with `N` extrapolated points at spacing `dq`:
//!
//! - real-space axis `x_k = π·k / (dq·N)`
//! - `Γ₁ = C[(I − bg)·q²] / Q`, with `Q = max C[(I − bg)·q²]`
//! - `Γ₃(x) = (1/x)·∫₀ˣ Γ₁`, `Γ₃(0) = 1`
//! - `IDF = C[−q⁴·(I − bg)] / Q`, where the DC term is replaced by the
//!   trapezoid integral of `−q⁴·(I − bg)` (the raw cosine sum at `k = 0`
//!   grossly overestimates it)
//!
//! Hilbert transform: the quadrature counterpart, obtained from the sine sums
//! `S[·]` of the same integrands. `Γ₁` is normalized by its largest magnitude
//! and the IDF's DC term is zero (a sine sum vanishes at `x = 0`).
//!
//! The Hilbert `Γ₁` is the quadrature of the cosine one: for a lamellar stack
//! its first maximum sits near a quarter of the long period, so parameters
//! extracted from it are not comparable with Fourier ones.
//!
//! `C` and `S` are the trigonometric sums of [`crate::math::spectral`].

use std::f64::consts::PI;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::domain::{Curve, TransformKind, TransformedData};
use crate::math::calculus::{cumulative_trapezoid, trapezoid};
use crate::math::spectral::trig_sums;
use crate::transform::{TransformError, TransformStage, TransformUpdate};

/// Element-wise loops check for cancellation after this many samples.
const CHUNK: usize = 4096;

/// Everything the worker needs, owned so it can move to another thread.
#[derive(Debug, Clone)]
pub struct TransformInput {
    pub qs: Vec<f64>,
    pub iqs: Vec<f64>,
    pub background: f64,
    /// Spacing of the measured q values.
    pub dq: f64,
    /// Measured `(qmin, qmax)`.
    pub q_range: (f64, f64),
}

/// Progress reporting plus cooperative cancellation for one run.
pub struct RunContext<'a> {
    cancel: &'a AtomicBool,
    on_update: &'a mut dyn FnMut(TransformUpdate),
}

impl<'a> RunContext<'a> {
    pub fn new(cancel: &'a AtomicBool, on_update: &'a mut dyn FnMut(TransformUpdate)) -> Self {
        Self { cancel, on_update }
    }

    fn report(&mut self, stage: TransformStage, percent: f64) {
        (self.on_update)(TransformUpdate::Progress { stage, percent });
    }

    fn checkpoint(&self) -> Result<(), TransformError> {
        if self.cancel.load(Ordering::Relaxed) {
            Err(TransformError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// `out[i] = f(i)` for `i < n`, checking for cancellation between chunks.
    fn map_indices(&self, n: usize, f: impl Fn(usize) -> f64) -> Result<Vec<f64>, TransformError> {
        let mut out = Vec::with_capacity(n);
        for start in (0..n).step_by(CHUNK) {
            self.checkpoint()?;
            out.extend((start..(start + CHUNK).min(n)).map(&f));
        }
        Ok(out)
    }
}

pub fn run(
    input: &TransformInput,
    kind: TransformKind,
    ctx: &mut RunContext<'_>,
) -> Result<TransformedData, TransformError> {
    let n = input.qs.len();
    if n < 2 {
        return Err(TransformError::TooShort(n));
    }
    ctx.report(TransformStage::Preparing, 0.0);
    ctx.checkpoint()?;

    let qs = &input.qs;
    let iqs = &input.iqs;
    let bg = input.background;
    let step = PI / (input.dq * n as f64);
    let xs = ctx.map_indices(n, |k| k as f64 * step)?;

    // Γ₁
    let lorentz = ctx.map_indices(n, |i| (iqs[i] - bg) * qs[i] * qs[i])?;
    ctx.checkpoint()?;
    let sums = trig_sums(&lorentz);
    let raw = match kind {
        TransformKind::Fourier => sums.cosine,
        TransformKind::Hilbert => sums.sine,
    };
    ensure_finite(&raw, TransformStage::CorrelationFunction)?;
    let norm = match kind {
        TransformKind::Fourier => raw.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        TransformKind::Hilbert => raw.iter().fold(0.0_f64, |m, v| m.max(v.abs())),
    };
    if norm == 0.0 {
        return Err(TransformError::ZeroNormalization);
    }
    let gamma_1 = ctx.map_indices(n, |k| raw[k] / norm)?;
    ensure_finite(&gamma_1, TransformStage::CorrelationFunction)?;
    ctx.report(TransformStage::CorrelationFunction, 40.0);

    // Γ₃
    let running = cumulative_trapezoid(&gamma_1, &xs);
    ctx.checkpoint()?;
    let gamma_3 = ctx.map_indices(n, |k| if k == 0 { 1.0 } else { running[k - 1] / xs[k] })?;
    ensure_finite(&gamma_3, TransformStage::ThreeDimensional)?;
    ctx.report(TransformStage::ThreeDimensional, 60.0);

    // IDF
    let q4 = ctx.map_indices(n, |i| -qs[i].powi(4) * (iqs[i] - bg))?;
    ctx.checkpoint()?;
    let sums = trig_sums(&q4);
    let mut idf = match kind {
        TransformKind::Fourier => sums.cosine,
        TransformKind::Hilbert => sums.sine,
    };
    idf[0] = match kind {
        TransformKind::Fourier => trapezoid(&q4, qs),
        TransformKind::Hilbert => 0.0,
    };
    let idf = ctx.map_indices(n, |k| idf[k] / norm)?;
    ensure_finite(&idf, TransformStage::InterfaceDistribution)?;
    ctx.report(TransformStage::InterfaceDistribution, 90.0);

    ctx.checkpoint()?;
    ctx.report(TransformStage::Finished, 100.0);

    Ok(TransformedData {
        gamma_1: Curve::from_parts(xs.clone(), gamma_1),
        gamma_3: Curve::from_parts(xs.clone(), gamma_3),
        idf: Curve::from_parts(xs, idf),
        q_range: input.q_range,
        kind,
    })
}

fn ensure_finite(values: &[f64], stage: TransformStage) -> Result<(), TransformError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(TransformError::NonFinite(stage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(n: usize) -> TransformInput {
        let dq = 0.01;
        let qs: Vec<f64> = (0..n).map(|i| i as f64 * dq).collect();
        // Smooth positive bump in q²·I.
        let iqs = qs
            .iter()
            .map(|&q| {
                if q == 0.0 {
                    1.0
                } else {
                    (-(q - 0.5).powi(2) / 0.02).exp() / (q * q) + 0.1
                }
            })
            .collect();
        TransformInput { qs, iqs, background: 0.1, dq, q_range: (0.01, 1.0) }
    }

    fn run_plain(
        input: &TransformInput,
        kind: TransformKind,
    ) -> Result<TransformedData, TransformError> {
        let cancel = AtomicBool::new(false);
        let mut sink = |_u: TransformUpdate| {};
        let mut ctx = RunContext::new(&cancel, &mut sink);
        run(input, kind, &mut ctx)
    }

    #[test]
    fn fourier_matches_direct_cosine_sum() {
        let input = input(300);
        let out = run_plain(&input, TransformKind::Fourier).unwrap();
        let n = input.qs.len();
        let direct: Vec<f64> = (0..n)
            .map(|k| {
                input
                    .qs
                    .iter()
                    .zip(input.iqs.iter())
                    .enumerate()
                    .map(|(i, (q, iq))| {
                        let arg = PI * k as f64 * (2 * i + 1) as f64 / (2 * n) as f64;
                        2.0 * (iq - input.background) * q * q * arg.cos()
                    })
                    .sum()
            })
            .collect();
        let norm = direct.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        for k in 0..n {
            assert!((out.gamma_1.y()[k] - direct[k] / norm).abs() < 1e-9, "k={k}");
        }
        assert_eq!(out.gamma_1.y()[0], 1.0);
        assert_eq!(out.gamma_3.y()[0], 1.0);
        assert!((out.gamma_1.x()[1] - PI / (0.01 * n as f64)).abs() < 1e-12);
    }

    #[test]
    fn hilbert_is_normalized_and_vanishes_at_origin() {
        let out = run_plain(&input(256), TransformKind::Hilbert).unwrap();
        let peak = out.gamma_1.y().iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        assert!((peak - 1.0).abs() < 1e-12);
        assert!(out.gamma_1.y()[0].abs() < 1e-12);
        assert_eq!(out.idf.y()[0], 0.0);
        assert_eq!(out.kind, TransformKind::Hilbert);
    }

    #[test]
    fn flat_curve_cannot_be_normalized() {
        let mut inp = input(64);
        inp.iqs = vec![0.1; 64];
        let err = run_plain(&inp, TransformKind::Fourier).unwrap_err();
        assert_eq!(err, TransformError::ZeroNormalization);
    }

    #[test]
    fn non_finite_intensity_is_reported_not_panicked() {
        let mut inp = input(64);
        inp.iqs[10] = f64::INFINITY;
        let err = run_plain(&inp, TransformKind::Fourier).unwrap_err();
        assert!(matches!(err, TransformError::NonFinite(_)), "{err:?}");
    }

    #[test]
    fn preset_cancel_flag_stops_before_any_work() {
        let inp = input(64);
        let cancel = AtomicBool::new(true);
        let mut updates = 0;
        let mut sink = |_u: TransformUpdate| updates += 1;
        let mut ctx = RunContext::new(&cancel, &mut sink);
        let err = run(&inp, TransformKind::Fourier, &mut ctx).unwrap_err();
        assert_eq!(err, TransformError::Cancelled);
        drop(ctx);
        assert_eq!(updates, 1);
    }
}

//! Library entry point: one measured curve plus its fit boundaries.
//!
//! `CorfuncCalculator` owns the (scaled) data, the Guinier/Porod boundaries and
//! the background level, and drives the stages in order:
//!
//! 1. [`CorfuncCalculator::compute_extrapolation`]
//! 2. [`CorfuncCalculator::compute_transform`] (background thread)
//! 3. [`CorfuncCalculator::extract_parameters`]
//!
//! At most one transform runs per calculator.

use tracing::{debug, info};

use crate::domain::{Curve, ExtrapolationParameters, TransformKind, TransformedData};
use crate::error::{CorfuncError, Result};
use crate::extract::{self, Extraction};
use crate::fit::{Extrapolation, estimate_background, extrapolate};
use crate::transform::{TransformInput, TransformJob, TransformUpdate};

pub struct CorfuncCalculator {
    data: Curve,
    lowerq: f64,
    upperq: (f64, f64),
    background: f64,
    transform: Option<TransformJob>,
}

impl CorfuncCalculator {
    /// Scale the data, then estimate the background from the Porod window.
    pub fn new(data: Curve, lowerq: f64, upperq: (f64, f64), scale: f64) -> Result<Self> {
        let data = prepare(data, scale)?;
        let background = estimate_background(&data, upperq)?;
        info!(points = data.len(), background, "calculator ready");
        Ok(Self {
            data,
            lowerq,
            upperq,
            background,
            transform: None,
        })
    }

    /// Replace the data (scaled by `scale`) and re-estimate the background.
    pub fn set_data(&mut self, data: Curve, scale: f64) -> Result<()> {
        let data = prepare(data, scale)?;
        self.background = estimate_background(&data, self.upperq)?;
        self.data = data;
        Ok(())
    }

    pub fn data(&self) -> &Curve {
        &self.data
    }

    pub fn background(&self) -> f64 {
        self.background
    }

    pub fn extrapolation_parameters(&self) -> ExtrapolationParameters {
        ExtrapolationParameters {
            qmin: self.data.x_min(),
            lowerq: self.lowerq,
            upperq_lo: self.upperq.0,
            upperq_hi: self.upperq.1,
            qmax: self.data.x_max(),
        }
    }

    /// Adopt new boundaries and re-estimate the background over the new Porod window.
    ///
    /// `qmin`/`qmax` are always taken from the data; those fields are ignored.
    pub fn set_extrapolation_parameters(&mut self, params: ExtrapolationParameters) -> Result<()> {
        let upperq = params.upperq();
        self.background = estimate_background(&self.data, upperq)?;
        self.lowerq = params.lowerq;
        self.upperq = upperq;
        Ok(())
    }

    /// Background over `upperq`, or over the stored Porod window.
    ///
    /// Does not change the stored background.
    pub fn compute_background(&self, upperq: Option<(f64, f64)>) -> Result<f64> {
        estimate_background(&self.data, upperq.unwrap_or(self.upperq))
    }

    pub fn compute_extrapolation(&self) -> Result<Extrapolation> {
        extrapolate(&self.data, self.lowerq, self.upperq, self.background)
    }

    /// Start transforming `extrapolation` on a background thread.
    ///
    /// Returns `false` (and does nothing) when a transform is already running.
    /// `on_update` receives progress and, if the run fails, one
    /// [`TransformUpdate::Failed`]; `on_complete` is called once with the
    /// result unless the run fails or is stopped.
    pub fn compute_transform<C, U>(
        &mut self,
        extrapolation: &Curve,
        kind: TransformKind,
        background: Option<f64>,
        on_complete: C,
        on_update: U,
    ) -> bool
    where
        C: FnOnce(TransformedData) + Send + 'static,
        U: FnMut(TransformUpdate) + Send + 'static,
    {
        if self.transform_is_running() {
            debug!("transform already running; request ignored");
            return false;
        }

        let q = self.data.x();
        let dq = q.windows(2).next().map_or(0.0, |w| w[1] - w[0]);
        let input = TransformInput {
            qs: extrapolation.x().to_vec(),
            iqs: extrapolation.y().to_vec(),
            background: background.unwrap_or(self.background),
            dq,
            q_range: (self.data.x_min(), self.data.x_max()),
        };

        self.transform = Some(TransformJob::spawn(input, kind, on_complete, on_update));
        true
    }

    pub fn transform_is_running(&self) -> bool {
        self.transform.as_ref().is_some_and(TransformJob::is_running)
    }

    /// Ask the running transform (if any) to stop. Its completion callback will not fire.
    pub fn stop_transform(&self) {
        if let Some(job) = self.transform.as_ref().filter(|job| job.is_running()) {
            job.cancel();
        }
    }

    /// Block until the current transform (if any) has exited.
    pub fn wait_transform(&mut self) {
        if let Some(job) = self.transform.as_mut() {
            job.wait();
        }
    }

    pub fn extract_parameters(&self, transformed: &TransformedData) -> Extraction {
        extract::extract_parameters(transformed)
    }
}

/// Multiply `y` and `dy` by `scale`; missing or all-zero `dy` becomes all ones.
///
/// A `dy` of the wrong length never gets here: [`Curve::new`] rejects it.
fn prepare(data: Curve, scale: f64) -> Result<Curve> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(CorfuncError::validation(format!("scale must be positive, got {scale}")));
    }
    let n = data.len();
    let y = data.y().iter().map(|v| v * scale).collect();
    let dy = match data.dy() {
        Some(dy) if dy.iter().any(|&e| e != 0.0) => dy.iter().map(|e| e * scale).collect(),
        _ => vec![1.0; n],
    };
    Curve::new(data.x().to_vec(), y, Some(dy))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::generate_sample;
    use crate::domain::SampleSpec;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn calculator() -> CorfuncCalculator {
        let data = generate_sample(&SampleSpec::default()).unwrap();
        CorfuncCalculator::new(data, 0.01, (0.2, 0.3), 1.0).unwrap()
    }

    fn wait_idle(calc: &CorfuncCalculator) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while calc.transform_is_running() {
            assert!(Instant::now() < deadline, "transform did not stop");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn scaling_and_default_uncertainties() {
        let data = Curve::new(
            vec![0.1, 0.2, 0.3, 0.4, 0.5],
            vec![5.0, 4.0, 3.0, 2.5, 2.2],
            Some(vec![0.0; 5]),
        )
        .unwrap();
        let prepared = prepare(data, 2.0).unwrap();
        assert_eq!(prepared.y(), &[10.0, 8.0, 6.0, 5.0, 4.4]);
        assert_eq!(prepared.dy().unwrap(), &[1.0; 5]);

        let with_dy = Curve::new(vec![0.1, 0.2], vec![1.0, 2.0], Some(vec![0.1, 0.2])).unwrap();
        assert_eq!(prepare(with_dy, 3.0).unwrap().dy().unwrap(), &[0.1 * 3.0, 0.2 * 3.0]);

        let bad = Curve::new(vec![0.1, 0.2], vec![1.0, 2.0], None).unwrap();
        assert_eq!(prepare(bad, 0.0).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn parameters_track_data_and_boundaries() {
        let mut calc = calculator();
        let p = calc.extrapolation_parameters();
        assert_eq!(p.qmin, calc.data().x_min());
        assert_eq!(p.qmax, calc.data().x_max());
        assert_eq!(p.upperq(), (0.2, 0.3));

        let narrower = ExtrapolationParameters {
            upperq_lo: 0.25,
            ..p
        };
        let expected = calc.compute_background(Some((0.25, 0.3))).unwrap();
        calc.set_extrapolation_parameters(narrower).unwrap();
        assert_eq!(calc.background(), expected);
        assert_eq!(calc.extrapolation_parameters().upperq_lo, 0.25);
    }

    #[test]
    fn background_is_close_to_the_injected_level() {
        let calc = calculator();
        let bg = calc.background();
        assert!((bg - 1e-4).abs() < 5e-5, "bg = {bg}");
    }

    #[test]
    fn transform_completes_through_the_calculator() {
        let mut calc = calculator();
        let ex = calc.compute_extrapolation().unwrap();
        let (tx, rx) = mpsc::channel();
        assert!(calc.compute_transform(
            &ex.curve,
            TransformKind::Fourier,
            None,
            move |d| tx.send(d).unwrap(),
            |_| {},
        ));
        calc.wait_transform();
        let data = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(data.gamma_1.len(), ex.curve.len());
        assert_eq!(data.q_range, (calc.data().x_min(), calc.data().x_max()));
        assert!(!calc.transform_is_running());
    }

    #[test]
    fn second_start_while_running_is_ignored() {
        let mut calc = calculator();
        let ex = calc.compute_extrapolation().unwrap();
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);
        let (gate_tx, gate_rx) = mpsc::channel::<()>();

        let started = calc.compute_transform(
            &ex.curve,
            TransformKind::Fourier,
            None,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            move |_| {
                let _ = gate_rx.recv_timeout(Duration::from_secs(1));
            },
        );
        assert!(started);
        assert!(calc.transform_is_running());
        assert!(!calc.compute_transform(&ex.curve, TransformKind::Hilbert, None, |_| {}, |_| {}));

        drop(gate_tx);
        calc.wait_transform();
        assert_eq!(completed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn stopped_transform_never_completes() {
        let mut calc = calculator();
        let ex = calc.compute_extrapolation().unwrap();
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);
        let (gate_tx, gate_rx) = mpsc::channel::<()>();

        assert!(calc.compute_transform(
            &ex.curve,
            TransformKind::Fourier,
            None,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            move |_| {
                let _ = gate_rx.recv_timeout(Duration::from_secs(1));
            },
        ));
        calc.stop_transform();
        drop(gate_tx);

        wait_idle(&calc);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
        // A new run may start once the old one is gone.
        assert!(calc.compute_transform(&ex.curve, TransformKind::Fourier, None, |_| {}, |_| {}));
        calc.wait_transform();
    }
}

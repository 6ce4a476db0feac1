//! Background execution of a transform.
//!
//! A [`TransformJob`] owns one worker thread plus two shared flags: `cancel`,
//! set by the owner and polled by the worker, and `running`, cleared by the
//! worker when it exits (whatever the outcome).
//!
//! Callbacks run on the worker, in order: progress updates, then either one
//! completion or one `Failed` update. A cancelled run calls neither.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use tracing::{debug, info, warn};

use crate::domain::{TransformKind, TransformedData};
use crate::transform::compute::{self, RunContext, TransformInput};
use crate::transform::{TransformError, TransformUpdate};

/// Handle to a transform running on its own thread.
pub struct TransformJob {
    cancel: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

/// Clears the running flag when the worker exits.
struct RunningGuard(Arc<AtomicBool>);

impl Drop for RunningGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TransformJob {
    /// Start the worker and return immediately.
    pub fn spawn<C, U>(
        input: TransformInput,
        kind: TransformKind,
        on_complete: C,
        mut on_update: U,
    ) -> Self
    where
        C: FnOnce(TransformedData) + Send + 'static,
        U: FnMut(TransformUpdate) + Send + 'static,
    {
        let cancel = Arc::new(AtomicBool::new(false));
        let running = Arc::new(AtomicBool::new(true));

        let worker_cancel = Arc::clone(&cancel);
        let guard = RunningGuard(Arc::clone(&running));

        let handle = std::thread::spawn(move || {
            let _guard = guard;
            info!(kind = kind.display_name(), points = input.qs.len(), "transform started");

            let outcome = {
                let mut ctx = RunContext::new(&worker_cancel, &mut on_update);
                compute::run(&input, kind, &mut ctx)
            };

            match outcome {
                // A stop requested after the last checkpoint still suppresses completion.
                Ok(_) if worker_cancel.load(Ordering::SeqCst) => {
                    debug!("transform cancelled after finishing");
                }
                Ok(data) => {
                    info!(kind = kind.display_name(), "transform finished");
                    on_complete(data);
                }
                Err(TransformError::Cancelled) => debug!("transform cancelled"),
                Err(err) => {
                    warn!(error = %err, "transform failed");
                    on_update(TransformUpdate::Failed { reason: err.to_string() });
                }
            }
        });

        Self {
            cancel,
            running,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Request cancellation. The worker stops at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Block until the worker has exited.
    pub fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("transform worker panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    fn input(n: usize) -> TransformInput {
        let dq = 0.001;
        let qs: Vec<f64> = (0..n).map(|i| i as f64 * dq).collect();
        let iqs = qs.iter().map(|&q| 1.0 + (-(q - 0.05f64).powi(2) / 1e-4).exp()).collect();
        TransformInput { qs, iqs, background: 1.0, dq, q_range: (0.001, 0.1) }
    }

    fn wait_idle(job: &TransformJob) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while job.is_running() {
            assert!(Instant::now() < deadline, "worker did not stop");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn completes_once_with_progress_first() {
        let (tx, rx) = mpsc::channel();
        let tx_update = tx.clone();
        let mut job = TransformJob::spawn(
            input(5000),
            TransformKind::Fourier,
            move |data| tx.send(Err(data)).unwrap(),
            move |update| tx_update.send(Ok(update)).unwrap(),
        );
        job.wait();
        assert!(!job.is_running());

        let messages: Vec<_> = rx.try_iter().collect();
        let completions = messages.iter().filter(|m| m.is_err()).count();
        assert_eq!(completions, 1);
        assert!(messages.last().unwrap().is_err());
        let first = &messages[0];
        assert!(matches!(first, Ok(TransformUpdate::Progress { percent, .. }) if *percent == 0.0));
    }

    #[test]
    fn cancelled_run_never_completes() {
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);
        let (gate_tx, gate_rx) = mpsc::channel::<()>();

        let job = TransformJob::spawn(
            input(20000),
            TransformKind::Fourier,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            move |_| {
                // Hold the worker until the test has requested cancellation.
                let _ = gate_rx.recv_timeout(Duration::from_secs(1));
            },
        );
        assert!(job.is_running());
        job.cancel();
        drop(gate_tx);

        wait_idle(&job);
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failure_is_reported_through_updates() {
        let mut bad = input(100);
        bad.iqs[3] = f64::NAN;
        let (tx, rx) = mpsc::channel();
        let completed = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&completed);
        let mut job = TransformJob::spawn(
            bad,
            TransformKind::Fourier,
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
            move |update| tx.send(update).unwrap(),
        );
        job.wait();
        let updates: Vec<_> = rx.try_iter().collect();
        assert!(matches!(updates.last(), Some(TransformUpdate::Failed { .. })), "{updates:?}");
        assert_eq!(completed.load(Ordering::SeqCst), 0);
    }
}

//! Bounded Levenberg–Marquardt for small nonlinear least-squares problems.
//!
//! Minimizes `Σ (y_i − f(x_i; p))²` for a model with an analytic Jacobian.
//! Bounds are handled by projecting each trial step back into the feasible box,
//! which is sufficient for the simple `σ >= 0` style constraints used here.
//!
//! Damping uses Marquardt's diagonal scaling (`λ·diag(JᵀJ)`) so parameters of
//! very different magnitude (a Porod constant next to a background level) are
//! stepped in a scale-invariant way.

use nalgebra::{DMatrix, DVector};

/// A model `f(x; p)` with partial derivatives `∂f/∂p_j`.
pub trait LeastSquaresModel {
    fn n_params(&self) -> usize;
    fn value(&self, x: f64, params: &[f64]) -> f64;
    /// Write `∂f/∂p_j` at `x` into `out` (length `n_params()`).
    fn gradient(&self, x: f64, params: &[f64], out: &mut [f64]);
}

#[derive(Debug, Clone)]
pub struct LmOptions {
    pub max_iterations: usize,
    /// Relative reduction in the sum of squares below which we stop.
    pub ftol: f64,
    /// Relative step size below which we stop.
    pub xtol: f64,
    pub initial_lambda: f64,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl LmOptions {
    pub fn unbounded(n: usize) -> Self {
        Self {
            max_iterations: 500,
            ftol: 1e-12,
            xtol: 1e-12,
            initial_lambda: 1e-3,
            lower: vec![f64::NEG_INFINITY; n],
            upper: vec![f64::INFINITY; n],
        }
    }

    pub fn with_bounds(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.lower = lower;
        self.upper = upper;
        self
    }
}

#[derive(Debug, Clone)]
pub struct LmReport {
    pub params: Vec<f64>,
    pub sse: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LmFailure {
    /// Iteration budget exhausted before a stopping criterion was met.
    MaxIterations(usize),
    /// The model produced NaN/Inf or the damped system could not be solved.
    NonFinite,
}

/// Run bounded Levenberg–Marquardt from `start`.
pub fn minimize<M: LeastSquaresModel>(
    model: &M,
    x: &[f64],
    y: &[f64],
    start: &[f64],
    opts: &LmOptions,
) -> Result<LmReport, LmFailure> {
    let p = model.n_params();
    let n = x.len();

    let mut params = project(start, &opts.lower, &opts.upper);
    let mut sse = sum_squares(model, x, y, &params).ok_or(LmFailure::NonFinite)?;
    let mut lambda = opts.initial_lambda;

    let mut jac = DMatrix::<f64>::zeros(n, p);
    let mut resid = DVector::<f64>::zeros(n);
    let mut row = vec![0.0; p];

    for iteration in 1..=opts.max_iterations {
        for i in 0..n {
            model.gradient(x[i], &params, &mut row);
            for j in 0..p {
                jac[(i, j)] = row[j];
            }
            resid[i] = y[i] - model.value(x[i], &params);
        }
        if jac.iter().any(|v| !v.is_finite()) {
            return Err(LmFailure::NonFinite);
        }

        let jtj = jac.transpose() * &jac;
        let jtr = jac.transpose() * &resid;

        // Inner loop: raise damping until a step reduces the sum of squares.
        loop {
            let mut damped = jtj.clone();
            for j in 0..p {
                let d = jtj[(j, j)].max(1e-300);
                damped[(j, j)] += lambda * d;
            }

            let step = match damped.lu().solve(&jtr) {
                Some(s) if s.iter().all(|v| v.is_finite()) => s,
                _ => {
                    lambda *= 10.0;
                    if lambda > 1e20 {
                        return Err(LmFailure::NonFinite);
                    }
                    continue;
                }
            };

            let trial: Vec<f64> = params.iter().zip(step.iter()).map(|(a, b)| a + b).collect();
            let trial = project(&trial, &opts.lower, &opts.upper);
            let trial_sse = sum_squares(model, x, y, &trial);

            match trial_sse {
                Some(t) if t <= sse => {
                    let reduction = sse - t;
                    let step_norm = trial
                        .iter()
                        .zip(params.iter())
                        .map(|(a, b)| (a - b).powi(2))
                        .sum::<f64>()
                        .sqrt();
                    let param_norm = params.iter().map(|v| v * v).sum::<f64>().sqrt();

                    params = trial;
                    sse = t;
                    lambda = (lambda / 10.0).max(1e-15);

                    if reduction <= opts.ftol * sse.max(f64::MIN_POSITIVE)
                        || step_norm <= opts.xtol * (param_norm + opts.xtol)
                    {
                        return Ok(LmReport { params, sse, iterations: iteration });
                    }
                    break;
                }
                _ => {
                    lambda *= 10.0;
                    if lambda > 1e16 {
                        // No descent direction left: we are at a (local) minimum.
                        return Ok(LmReport { params, sse, iterations: iteration });
                    }
                }
            }
        }
    }

    Err(LmFailure::MaxIterations(opts.max_iterations))
}

fn project(p: &[f64], lower: &[f64], upper: &[f64]) -> Vec<f64> {
    p.iter()
        .zip(lower.iter().zip(upper.iter()))
        .map(|(&v, (&lo, &hi))| v.clamp(lo, hi))
        .collect()
}

fn sum_squares<M: LeastSquaresModel>(
    model: &M,
    x: &[f64],
    y: &[f64],
    params: &[f64],
) -> Option<f64> {
    let sse: f64 = x
        .iter()
        .zip(y.iter())
        .map(|(&xi, &yi)| (yi - model.value(xi, params)).powi(2))
        .sum();
    sse.is_finite().then_some(sse)
}

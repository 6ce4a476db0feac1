//! Cosine and sine sums (DCT-II / its quadrature counterpart) via FFT.
//!
//! For a real signal `f_n`, `n = 0..N`:
//!
//! ```text
//! C_k = 2 Σ f_n cos(π k (2n + 1) / 2N)
//! S_k = 2 Σ f_n sin(π k (2n + 1) / 2N)
//! ```
//!
//! Both come out of one complex FFT of the zero-padded signal of length `2N`:
//! with `F_k = FFT(f ⧺ 0)_k` and twiddle `w_k = exp(−iπk / 2N)`,
//! `C_k = 2·Re(w_k F_k)` and `S_k = −2·Im(w_k F_k)`.

use std::f64::consts::PI;

use rustfft::FftPlanner;
use rustfft::num_complex::Complex;

/// Cosine (`C_k`) and sine (`S_k`) sums of `signal`.
#[derive(Debug, Clone)]
pub struct TrigSums {
    pub cosine: Vec<f64>,
    pub sine: Vec<f64>,
}

pub fn trig_sums(signal: &[f64]) -> TrigSums {
    let n = signal.len();
    if n == 0 {
        return TrigSums { cosine: Vec::new(), sine: Vec::new() };
    }

    let mut buffer: Vec<Complex<f64>> = Vec::with_capacity(2 * n);
    buffer.extend(signal.iter().map(|&v| Complex::new(v, 0.0)));
    buffer.resize(2 * n, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(2 * n);
    fft.process(&mut buffer);

    let mut cosine = Vec::with_capacity(n);
    let mut sine = Vec::with_capacity(n);
    for (k, f) in buffer.iter().take(n).enumerate() {
        let phase = -PI * k as f64 / (2 * n) as f64;
        let z = f * Complex::new(phase.cos(), phase.sin());
        cosine.push(2.0 * z.re);
        sine.push(-2.0 * z.im);
    }

    TrigSums { cosine, sine }
}

//! Piecewise-linear interpolation of sampled data.

use crate::math::smooth::Function1d;

/// Linear interpolant through `(x_i, y_i)` with strictly increasing `x`.
///
/// Outside the sampled range the end values are held constant. Within the
/// extrapolation the interpolant is only ever queried inside the measured
/// range, the hold just keeps it total.
#[derive(Debug, Clone)]
pub struct LinearInterpolator {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl LinearInterpolator {
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        debug_assert_eq!(x.len(), y.len());
        debug_assert!(!x.is_empty());
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
        }
    }
}

impl Function1d for LinearInterpolator {
    fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        if t <= self.x[0] {
            return self.y[0];
        }
        if t >= self.x[n - 1] {
            return self.y[n - 1];
        }
        // First index with x > t; t lies in [x[hi-1], x[hi]).
        let hi = self.x.partition_point(|&v| v <= t);
        let lo = hi - 1;
        let u = (t - self.x[lo]) / (self.x[hi] - self.x[lo]);
        self.y[lo] + u * (self.y[hi] - self.y[lo])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_between_and_holds_outside() {
        let f = LinearInterpolator::new(&[1.0, 2.0, 4.0], &[10.0, 20.0, 0.0]);
        assert_eq!(f.eval(1.0), 10.0);
        assert_eq!(f.eval(1.5), 15.0);
        assert_eq!(f.eval(2.0), 20.0);
        assert_eq!(f.eval(3.0), 10.0);
        assert_eq!(f.eval(4.0), 0.0);
        assert_eq!(f.eval(0.0), 10.0);
        assert_eq!(f.eval(9.0), 0.0);
    }
}

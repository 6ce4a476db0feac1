//! One-dimensional functions and the smooth join between two of them.
//!
//! The extrapolated intensity is a composition of joins:
//!
//! ```text
//! s1 = join(data, porod,   [upperq_lo, qmax])
//! s2 = join(guinier, s1,   [qmin, lowerq])
//! ```
//!
//! so joins must themselves be usable as the inputs of further joins. That is
//! what [`Function1d`] is for.

/// A real function of one real variable, usable from worker threads.
pub trait Function1d: Send + Sync {
    fn eval(&self, x: f64) -> f64;

    /// Element-wise evaluation.
    fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }
}

impl<F> Function1d for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn eval(&self, x: f64) -> f64 {
        self(x)
    }
}

/// Continuous blend of `left` (below `start`) into `right` (above `stop`).
///
/// Inside the transition the result is `(1 − h)·left + h·right` with
/// `h(x) = 1 / (1 + (x − stop)² / (x − start)²)`, which rises monotonically
/// from 0 at `start` to 1 at `stop`.
#[derive(Debug, Clone)]
pub struct SmoothJoin<L, R> {
    left: L,
    right: R,
    start: f64,
    stop: f64,
}

impl<L: Function1d, R: Function1d> SmoothJoin<L, R> {
    /// `start < stop` is required.
    pub fn new(left: L, right: R, start: f64, stop: f64) -> Self {
        debug_assert!(start < stop, "transition interval must be non-empty");
        Self { left, right, start, stop }
    }

    /// The `(start, stop)` interval over which the blend happens.
    pub fn transition(&self) -> (f64, f64) {
        (self.start, self.stop)
    }

    /// Weight of `right` at `x` (0 left of the transition, 1 right of it).
    pub fn weight(&self, x: f64) -> f64 {
        if x <= self.start {
            0.0
        } else if x >= self.stop {
            1.0
        } else {
            let ratio = (x - self.stop) / (x - self.start);
            1.0 / (1.0 + ratio * ratio)
        }
    }
}

impl<L: Function1d, R: Function1d> Function1d for SmoothJoin<L, R> {
    fn eval(&self, x: f64) -> f64 {
        if x <= self.start {
            self.left.eval(x)
        } else if x >= self.stop {
            self.right.eval(x)
        } else {
            let h = self.weight(x);
            (1.0 - h) * self.left.eval(x) + h * self.right.eval(x)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn join() -> SmoothJoin<impl Function1d, impl Function1d> {
        SmoothJoin::new(|x: f64| 2.0 * x, |x: f64| 10.0 - x, 1.0, 3.0)
    }

    #[test]
    fn matches_each_side_outside_and_at_the_boundaries() {
        let g = join();
        assert_eq!(g.eval(0.5), 1.0);
        assert_eq!(g.eval(1.0), 2.0);
        assert_eq!(g.eval(3.0), 7.0);
        assert_eq!(g.eval(4.0), 6.0);
    }

    #[test]
    fn is_continuous_at_both_ends() {
        let g = join();
        let eps = 1e-7;
        assert!((g.eval(1.0 + eps) - 2.0).abs() < 1e-5);
        assert!((g.eval(3.0 - eps) - 7.0).abs() < 1e-5);
    }

    #[test]
    fn weight_is_monotonic_and_bounded() {
        let g = join();
        let mut prev = 0.0;
        for i in 0..=200 {
            let x = 0.5 + i as f64 * 0.0175;
            let h = g.weight(x);
            assert!((0.0..=1.0).contains(&h));
            assert!(h >= prev, "weight decreased at x={x}");
            prev = h;
        }
    }

    #[test]
    fn blend_lies_between_the_two_functions() {
        let g = join();
        for i in 1..20 {
            let x = 1.0 + i as f64 * 0.1;
            let (a, b) = (2.0 * x, 10.0 - x);
            let v = g.eval(x);
            assert!(v >= a.min(b) - 1e-12 && v <= a.max(b) + 1e-12);
        }
    }

    #[test]
    fn slice_evaluation_is_element_wise() {
        let g = join();
        let xs = [0.0, 1.5, 2.0, 3.5];
        let ys = g.eval_many(&xs);
        assert_eq!(ys.len(), xs.len());
        for (x, y) in xs.iter().zip(ys.iter()) {
            assert_eq!(*y, g.eval(*x));
        }
        assert_eq!(g.eval_many(&[2.5]), vec![g.eval(2.5)]);
    }

    #[test]
    fn joins_compose() {
        let inner = join();
        let outer = SmoothJoin::new(|_x: f64| 0.0, inner, -1.0, 0.0);
        assert_eq!(outer.transition(), (-1.0, 0.0));
        assert_eq!(outer.eval(-2.0), 0.0);
        assert_eq!(outer.eval(4.0), 6.0);
        // The inner join's interval still applies inside the composition.
        assert_eq!(outer.eval(2.0), join().eval(2.0));
    }
}

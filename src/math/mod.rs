//! Numerical kernels: least squares, interpolation, smooth joins,
//! trigonometric sums and discrete calculus.

pub mod calculus;
pub mod interp;
pub mod lm;
pub mod ols;
pub mod smooth;
pub mod spectral;

pub use interp::LinearInterpolator;
pub use ols::*;
pub use smooth::{Function1d, SmoothJoin};

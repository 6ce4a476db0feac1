//! `corfunc` library crate.
//!
//! Correlation-function analysis of 1-D small-angle scattering curves: Guinier
//! and Porod tail fits, a smooth extrapolation over all q, a Fourier or Hilbert
//! transform to real space, and structural parameters read off the result.
//!
//! The binary (`corfunc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - [`calculator::CorfuncCalculator`] can be embedded in other front-ends

pub mod app;
pub mod calculator;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod extract;
pub mod fit;
pub mod logging;
pub mod math;
pub mod models;
pub mod plot;
pub mod report;
pub mod transform;

pub use calculator::CorfuncCalculator;
pub use error::{CorfuncError, FittingError, Result};
pub use extract::{Degeneracy, Extraction};

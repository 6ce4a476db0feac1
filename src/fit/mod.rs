//! Tail fitting and extrapolation.
//!
//! Responsibilities:
//!
//! - select the Guinier and Porod windows
//! - fit the Porod law (bounded Levenberg–Marquardt) and the Guinier law (SVD)
//! - estimate the flat background
//! - join data and tails into one extrapolated intensity

pub mod background;
pub mod extrapolate;
pub mod guinier;
pub mod porod;
pub mod regions;

pub use background::estimate_background;
pub use extrapolate::{Extrapolation, ExtrapolatedIntensity, extrapolate};
pub use guinier::fit_guinier;
pub use porod::fit_porod;

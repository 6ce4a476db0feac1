//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the `Curve` value type and the fit-region boundaries
//! - fit outputs (`PorodFitResult`, `GuinierFitResult`, `FitParameters`)
//! - transform outputs and extracted structural parameters
//! - run configuration (`AnalysisConfig`, `SampleSpec`)

pub mod types;

pub use types::*;

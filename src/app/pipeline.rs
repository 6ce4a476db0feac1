//! The analysis pipeline behind `corfunc analyze`.
//!
//! sample generation -> background -> extrapolation -> transform (worker
//! thread, with a progress bar) -> parameter extraction
//!
//! The transform is asynchronous in the library; here we simply block on the
//! worker's messages until it exits.

use std::sync::mpsc;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::calculator::CorfuncCalculator;
use crate::data::generate_sample;
use crate::domain::{AnalysisConfig, Curve, TransformKind, TransformedData};
use crate::error::{CorfuncError, Result};
use crate::extract::Extraction;
use crate::fit::Extrapolation;
use crate::transform::TransformUpdate;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Scaled measured curve as the calculator sees it.
    pub data: Curve,
    pub background: f64,
    pub extrapolation: Extrapolation,
    pub transformed: TransformedData,
    pub extraction: Extraction,
}

pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput> {
    config.validate()?;

    let data = generate_sample(&config.sample)?;
    let mut calculator = CorfuncCalculator::new(data, config.lowerq, config.upperq, config.scale)?;
    let extrapolation = calculator.compute_extrapolation()?;

    let transformed = run_transform(
        &mut calculator,
        &extrapolation.curve,
        config.transform,
        config.progress,
    )?;
    let extraction = calculator.extract_parameters(&transformed);
    info!(found = extraction.is_found(), "analysis finished");

    Ok(RunOutput {
        data: calculator.data().clone(),
        background: calculator.background(),
        extrapolation,
        transformed,
        extraction,
    })
}

enum Event {
    Update(TransformUpdate),
    Done(Box<TransformedData>),
}

/// Start the transform and wait for it, mirroring progress onto a bar.
fn run_transform(
    calculator: &mut CorfuncCalculator,
    extrapolated: &Curve,
    kind: TransformKind,
    progress: bool,
) -> Result<TransformedData> {
    let (tx, rx) = mpsc::channel();
    let done_tx = tx.clone();

    let started = calculator.compute_transform(
        extrapolated,
        kind,
        None,
        move |data| {
            let _ = done_tx.send(Event::Done(Box::new(data)));
        },
        move |update| {
            let _ = tx.send(Event::Update(update));
        },
    );
    if !started {
        return Err(CorfuncError::Transform("a transform is already running".to_string()));
    }

    let bar = progress.then(|| progress_bar(kind));
    let mut result = None;
    let mut failure = None;

    // Ends once the worker has dropped both callbacks.
    for event in rx {
        match event {
            Event::Update(TransformUpdate::Progress { stage, percent }) => {
                if let Some(bar) = &bar {
                    bar.set_position(percent.round() as u64);
                    bar.set_message(stage.to_string());
                }
            }
            Event::Update(TransformUpdate::Failed { reason }) => failure = Some(reason),
            Event::Done(data) => result = Some(*data),
        }
    }
    calculator.wait_transform();

    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    match (result, failure) {
        (Some(data), _) => Ok(data),
        (None, Some(reason)) => Err(CorfuncError::Transform(reason)),
        (None, None) => Err(CorfuncError::Transform(
            "transform ended without a result".to_string(),
        )),
    }
}

fn progress_bar(kind: TransformKind) -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template("{prefix} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
        .map(|s| s.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar.set_prefix(format!("{} transform", kind.display_name()));
    bar
}

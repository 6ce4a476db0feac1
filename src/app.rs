//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - generates the synthetic curve
//! - runs the analysis pipeline
//! - prints the report, plot or JSON

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, SampleArgs};
use crate::data::generate_sample;
use crate::error::{CorfuncError, Result};
use crate::extract::Extraction;
use crate::report::{RunReport, format_run_summary};

pub mod pipeline;

/// Entry point for the `corfunc` binary.
pub fn run() -> Result<()> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init_tracing();

    match cli.command {
        Command::Analyze(args) => handle_analyze(&args),
        Command::Sample(args) => handle_sample(&args),
    }
}

fn handle_analyze(args: &AnalyzeArgs) -> Result<()> {
    let config = args.to_config();
    let run = pipeline::run_analysis(&config)?;
    let report = RunReport::from_run(&run);

    if config.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| CorfuncError::Output(e.to_string()))?;
        println!("{json}");
    } else {
        println!("{}", format_run_summary(&report, &config.sample));
        if config.plot {
            let supplementary = match &run.extraction {
                Extraction::Found(_, s) => Some(s),
                Extraction::NoSignal(_) => None,
            };
            let label = format!("gamma_1 ({})", config.transform.display_name());
            println!(
                "{}",
                crate::plot::render_correlation_plot(
                    &run.transformed.gamma_1,
                    supplementary,
                    &label,
                    config.plot_width,
                    config.plot_height,
                )
            );
        }
    }

    match run.extraction {
        Extraction::Found(..) => Ok(()),
        Extraction::NoSignal(reason) => Err(CorfuncError::NoSignal(reason.to_string())),
    }
}

fn handle_sample(args: &SampleArgs) -> Result<()> {
    let curve = generate_sample(&args.to_spec())?;

    println!("# q I dI");
    for (i, (q, iq)) in curve.x().iter().zip(curve.y()).enumerate() {
        let dy = curve.dy().map_or(0.0, |dy| dy[i]);
        println!("{q:.6e} {iq:.6e} {dy:.6e}");
    }
    Ok(())
}

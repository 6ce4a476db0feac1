//! Command-line parsing for the `corfunc` binary.
//!
//! Argument parsing and dispatch stay separate from the analysis code: every
//! subcommand's flags are turned into plain config structs (`SampleSpec`,
//! `AnalysisConfig`) before anything runs.

use clap::{Args, Parser, Subcommand};

use crate::domain::{AnalysisConfig, SampleSpec, TransformKind};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "corfunc",
    version,
    about = "Correlation-function analysis of small-angle scattering curves"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a synthetic lamellar curve and run the full analysis on it.
    Analyze(AnalyzeArgs),
    /// Print the synthetic curve as a whitespace-separated table (q, I, dI).
    Sample(SampleArgs),
}

/// Options of the synthetic lamellar sample.
#[derive(Debug, Args, Clone)]
pub struct SampleArgs {
    /// Injected long period (units of 1/q).
    #[arg(long, default_value_t = 100.0)]
    pub long_period: f64,

    /// Width of the Bragg peak as a fraction of its position.
    #[arg(long, default_value_t = 0.1)]
    pub peak_width: f64,

    #[arg(long, default_value_t = 1.0)]
    pub peak_amplitude: f64,

    /// Porod constant K.
    #[arg(long, default_value_t = 1e-6)]
    pub porod_k: f64,

    /// Interface width sigma of the Porod term.
    #[arg(long, default_value_t = 3.0)]
    pub porod_sigma: f64,

    /// Flat background.
    #[arg(long, default_value_t = 1e-4)]
    pub background: f64,

    #[arg(long, default_value_t = 0.005)]
    pub qmin: f64,

    #[arg(long, default_value_t = 0.3)]
    pub qmax: f64,

    /// Number of q points.
    #[arg(short = 'n', long, default_value_t = 591)]
    pub points: usize,

    /// Relative Gaussian noise on the intensity (0 disables noise).
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Random seed for the noise.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[derive(Debug, Args, Clone)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub sample: SampleArgs,

    /// Upper boundary of the Guinier region.
    #[arg(long, default_value_t = 0.01)]
    pub lowerq: f64,

    /// Lower boundary of the Porod region.
    #[arg(long, default_value_t = 0.2)]
    pub upperq_lo: f64,

    /// Upper boundary of the Porod region.
    #[arg(long, default_value_t = 0.3)]
    pub upperq_hi: f64,

    #[arg(long, value_enum, default_value_t = TransformKind::Fourier)]
    pub transform: TransformKind,

    /// Scale factor applied to the intensity.
    #[arg(long, default_value_t = 1.0)]
    pub scale: f64,

    /// Render an ASCII plot of the correlation function (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Print the results as JSON instead of the text report.
    #[arg(long)]
    pub json: bool,

    /// Hide the transform progress bar.
    #[arg(long)]
    pub quiet: bool,
}

impl SampleArgs {
    pub fn to_spec(&self) -> SampleSpec {
        SampleSpec {
            long_period: self.long_period,
            peak_width: self.peak_width,
            peak_amplitude: self.peak_amplitude,
            porod_k: self.porod_k,
            porod_sigma: self.porod_sigma,
            background: self.background,
            q_min: self.qmin,
            q_max: self.qmax,
            n_points: self.points,
            noise: self.noise,
            seed: self.seed,
        }
    }
}

impl AnalyzeArgs {
    pub fn to_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            sample: self.sample.to_spec(),
            lowerq: self.lowerq,
            upperq: (self.upperq_lo, self.upperq_hi),
            scale: self.scale,
            transform: self.transform,
            plot: self.plot && !self.no_plot && !self.json,
            plot_width: self.width,
            plot_height: self.height,
            json: self.json,
            progress: !self.quiet && !self.json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_sample_defaults() {
        let cli = Cli::parse_from(["corfunc", "analyze"]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let config = args.to_config();
        assert_eq!(config.sample, SampleSpec::default());
        assert_eq!(config.upperq, (0.2, 0.3));
        assert_eq!(config.transform, TransformKind::Fourier);
        assert!(config.plot && config.progress && !config.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_disables_plot_and_progress() {
        let cli = Cli::parse_from([
            "corfunc",
            "analyze",
            "--json",
            "--transform",
            "hilbert",
            "--noise",
            "0.01",
        ]);
        let Command::Analyze(args) = cli.command else {
            panic!("expected analyze");
        };
        let config = args.to_config();
        assert!(config.json && !config.plot && !config.progress);
        assert_eq!(config.transform, TransformKind::Hilbert);
        assert_eq!(config.sample.noise, 0.01);
    }

    #[test]
    fn sample_subcommand_parses_options() {
        let cli = Cli::parse_from(["corfunc", "sample", "-n", "50", "--seed", "7"]);
        let Command::Sample(args) = cli.command else {
            panic!("expected sample");
        };
        let spec = args.to_spec();
        assert_eq!(spec.n_points, 50);
        assert_eq!(spec.seed, 7);
    }
}

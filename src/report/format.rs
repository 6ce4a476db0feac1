//! Plain-text rendering of a [`RunReport`].
//!
//! Formatting lives here so the numerical modules never print anything.

use crate::domain::{ExtractedParameters, SampleSpec, TransformKind};
use crate::report::RunReport;

/// Format the full run summary (data, fits, extracted parameters).
pub fn format_run_summary(report: &RunReport, sample: &SampleSpec) -> String {
    let mut out = String::new();

    out.push_str("=== corfunc - correlation function analysis ===\n");
    out.push_str(&format!(
        "Sample: synthetic lamellar stack | L={} | noise={} | seed={}\n",
        sample.long_period, sample.noise, sample.seed
    ));
    out.push_str(&format!(
        "Data: n={} | q=[{:.4}, {:.4}]\n",
        report.points, report.q_range.0, report.q_range.1
    ));
    out.push_str(&format!("Background: {:.6e}\n", report.background));

    out.push_str("\nTail fits:\n");
    out.push_str(&format!(
        "- Guinier: ln I = A + B q^2 | A={:.6} B={:.6}\n",
        report.fit.a, report.fit.b
    ));
    out.push_str(&format!(
        "- Porod  : I = bg + K q^-4 exp(-q^2 sigma^2) | K={:.6e} sigma={:.6}\n",
        report.fit.k, report.fit.sigma
    ));
    out.push_str(&format!(
        "- Extrapolated to n={} points\n",
        report.extrapolated_points
    ));

    out.push_str(&format!("\n{} transform:\n", report.transform.display_name()));
    if report.transform == TransformKind::Hilbert {
        out.push_str(
            "Note: parameters from the quadrature correlation function are not comparable \
             with Fourier ones (its first maximum sits near a quarter of the long period).\n",
        );
    }
    match (&report.parameters, &report.no_signal) {
        (Some(p), _) => out.push_str(&format_parameters(p)),
        (None, Some(reason)) => out.push_str(&format!("No structural signal: {reason}\n")),
        (None, None) => out.push_str("No structural signal.\n"),
    }

    out
}

fn format_parameters(p: &ExtractedParameters) -> String {
    let rows = [
        ("Long period", p.long_period),
        ("Average hard block thickness", p.hard_block_thickness),
        ("Average soft block thickness", p.soft_block_thickness),
        ("Average interface thickness", p.interface_thickness),
        ("Average core thickness", p.core_thickness),
        ("Local crystallinity", p.local_crystallinity),
        ("Polydispersity (Ryan)", p.polydispersity_ryan),
        ("Polydispersity (Stribeck)", p.polydispersity_stribeck),
    ];
    let mut out = String::new();
    for (name, value) in rows {
        out.push_str(&format!("{name:<30} {value:>12.4}\n"));
    }
    out
}

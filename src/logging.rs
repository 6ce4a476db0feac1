//! Tracing setup for the binary and for tests.
//!
//! Filtering follows `RUST_LOG`, for example:
//!
//! - `RUST_LOG=corfunc=debug` shows fit and transform internals
//! - `RUST_LOG=corfunc::transform=trace,corfunc=info` mixes levels per module

#[cfg(test)]
use once_cell::sync::Lazy;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "corfunc=warn";

/// Install the global subscriber. Call once, early in `main`.
///
/// Logs go to stderr so reports and JSON on stdout stay machine-readable.
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Route tracing output through the test harness. Safe to call from every test.
#[cfg(test)]
pub fn init_test_tracing() {
    static TRACING: Lazy<()> = Lazy::new(|| {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .with_test_writer()
            .init();
    });

    Lazy::force(&TRACING);
}

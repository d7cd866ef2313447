//! Tracing setup for the `iob` binary.
//!
//! The calculator's answer is the only thing written to stdout, so scripts can
//! capture `Total IOB: ...` or the JSON document directly. Diagnostics (config
//! lookup, skipped doses, degenerate curves) go to stderr instead.
//!
//! Quiet by default: only warnings surface unless `--verbose` or `RUST_LOG`
//! asks for more.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `--verbose` nor `RUST_LOG` is given
const QUIET_DIRECTIVE: &str = "warn";

/// Filter used with `--verbose`: per-dose decisions from the core
const VERBOSE_DIRECTIVE: &str = "debug";

/// Pick the default filter for the requested verbosity
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        VERBOSE_DIRECTIVE
    } else {
        QUIET_DIRECTIVE
    }
}

/// Install the stderr subscriber. `RUST_LOG`, when set, wins over `verbose`.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Route debug output through the test harness
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new(VERBOSE_DIRECTIVE))
        .try_init();
}

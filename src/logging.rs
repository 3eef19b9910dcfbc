// ============================================================================
// src/logging.rs – tracing subscriber bootstrap (stderr, RUST_LOG aware)
// ============================================================================

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter for a verbosity level: `--quiet` → warn, none → info,
/// `-v` → debug, `-vv` and up → trace.
pub fn default_filter(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "warn";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the computed filter.
/// A second call is a no-op.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, quiet)));

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .try_init();
}

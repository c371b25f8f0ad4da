//! Logging setup.
//!
//! Structured logging through `tracing`, printed by `tracing-subscriber`.
//! The level is chosen by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set), with full `EnvFilter` syntax
//! 2. CLI flags: `--quiet` (errors only) or `-v`/`-vv` (debug/trace)
//! 3. Default: info
//!
//! Cache hits and misses are logged at debug; server-side request failures
//! at error, with the detail that is withheld from the client.

use tracing_subscriber::EnvFilter;

/// Initialize the global subscriber. Later calls are no-ops.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(level_for(verbose, quiet)),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Map CLI verbosity flags to a filter directive. `quiet` wins over `verbose`.
fn level_for(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

//! Logging initialization for `irq_rust`.
//!
//! Diagnostics go to stderr through tracing; stdout stays clean for
//! command output. `RUST_LOG` overrides the verbosity flags.

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber from verbosity flags.
///
/// `-v` maps to debug, `-vv` and above to trace; `--quiet` restricts to
/// errors. The default shows warnings, which is where queue store notices
/// land when the CLI routes them through tracing.
///
/// # Errors
///
/// Returns an error message if a subscriber is already installed.
pub fn init_logging(verbose: u8, quiet: bool) -> Result<(), String> {
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| e.to_string())
}

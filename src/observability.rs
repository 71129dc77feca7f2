//! Logging setup for the binary

use tracing_subscriber::EnvFilter;

/// Install a stderr `tracing` subscriber
///
/// `RUST_LOG` selects the filter; `verbose` forces `debug`. Safe to call more than once.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

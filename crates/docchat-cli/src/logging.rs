//! stderr logging setup

use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `warn`, or `debug` with `--verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

//! Log filter for the `revisa` binary

use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, defaulting to `info`.
///
/// `--verbose` forces `debug`. An unparsable `RUST_LOG` falls back to the
/// default level.
pub fn env_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

//! Stderr logging for the binaries; stdout is reserved for results.

use tracing_subscriber::EnvFilter;

/// `level` overrides `RUST_LOG`; an unparsable filter falls back to `info`.
fn env_filter(level: Option<&str>) -> EnvFilter {
    let parsed = match level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    };
    parsed.unwrap_or_else(|| EnvFilter::new("info"))
}

pub fn init_logging(level: Option<&str>) {
    // Ignore the error if a subscriber is already installed (tests, embedding).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

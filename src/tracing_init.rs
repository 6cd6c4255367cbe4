//! Log setup shared by the binary.

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn";

/// Filter from `RUST_LOG`-style directives, or warnings only when unset or invalid.
pub fn env_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Log to stderr, honoring `RUST_LOG`.
pub fn init() {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .init();
}

pub mod config;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

/// Initialize tracing for the host process.
///
/// Call once at startup (before the first request). Honors `RUST_LOG`,
/// defaulting to `info` when unset.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

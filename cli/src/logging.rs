//! Logging init: structured output on stderr so stdout stays machine-readable.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,hal_form=debug,hal_form_core=debug";

/// Initialize logging to stderr, honouring `RUST_LOG` when set.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

//! Tracing subscriber setup.

use gymbro_core::config::{Environment, RootConfig};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when set; otherwise `log_level` from the config applies.
/// Production emits JSON lines, local emits human-readable text.
pub fn init(config: &RootConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let _ = match config.env {
        Environment::Production => builder.json().try_init(),
        Environment::Local => builder.with_target(false).try_init(),
    };
}

//! # Logging Setup
//!
//! Structured logging initialization from a [`LoggingConfig`].
//!
//! Uses `tracing-subscriber` with an environment-filter override: setting
//! `RUST_LOG` takes precedence over the configured level, which keeps
//! field debugging possible without touching config files.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once; only the first call installs a subscriber.
pub fn init(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string().to_lowercase()));

    if config.json_format {
        let _ = tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
    }
}

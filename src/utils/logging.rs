//! Logging utilities
//!
//! Provides logging setup and configuration.

use env_logger::Env;

/// Setup logging for the drive. `RUST_LOG` wins over `default_level`.
pub fn setup_logging(default_level: &str) {
    // A second init (e.g. from tests) is not an error worth surfacing.
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}

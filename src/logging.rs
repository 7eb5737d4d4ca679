//! Logging setup for hosts that do not bring their own `log` backend.

use crate::config::LogLevel;

/// Install an `env_logger` backend at the given level. `RUST_LOG` wins when it is set.
///
/// Safe to call more than once; only the first call installs a logger.
pub fn init(level: LogLevel) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level.into());
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    if builder.try_init().is_err() {
        log::debug!("logger already installed, keeping it");
    }
}

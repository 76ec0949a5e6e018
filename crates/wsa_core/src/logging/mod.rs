//! Logging setup.
//!
//! The library logs through `tracing` macros only. Hosts call
//! [`init_tracing`] once at startup (or [`init_from_settings`] with the
//! `[logging]` config section) to install a stderr subscriber.
//!
//! # Example
//!
//! ```no_run
//! use wsa_core::logging::{init_tracing, LogLevel};
//!
//! init_tracing(LogLevel::Debug);
//! tracing::info!("ready");
//! ```

mod types;

pub use types::LogLevel;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingSettings;

/// Install the global stderr subscriber.
///
/// `RUST_LOG` wins over `default_level` when set. Later calls are no-ops.
pub fn init_tracing(default_level: LogLevel) {
    init_with(default_level, true);
}

/// Initialize tracing from the `[logging]` config section.
pub fn init_from_settings(settings: &LoggingSettings) {
    init_with(settings.level, settings.show_target);
}

fn init_with(default_level: LogLevel, show_target: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_filter_str()));

    // A host may already have installed a subscriber
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(show_target).with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Initialize tracing for tests (only logs warnings and above).
#[cfg(test)]
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}

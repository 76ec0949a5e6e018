//! Configuration management.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Range validation on load
//!
//! # Example
//!
//! ```no_run
//! use wsa_core::config::{ConfigManager, ConfigSection};
//! use wsa_core::models::AlignmentMode;
//!
//! // Create manager and load (or create default) config
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! // Read settings
//! println!("Max lag: {}", config.settings().analysis.max_lag);
//!
//! // Modify a setting
//! config.settings_mut().analysis.alignment = AlignmentMode::SheetKeyed;
//!
//! // Save just the analysis section atomically
//! config.update_section(ConfigSection::Analysis).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    AnalysisSettings, ConfigSection, DisplaySettings, LoggingSettings, Settings,
    MAX_ROLLING_WINDOW,
};

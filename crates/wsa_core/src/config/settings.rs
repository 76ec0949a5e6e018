//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::correlation::MAX_LAG_LIMIT;
use crate::logging::LogLevel;
use crate::models::{AlignmentMode, GroupStat, MissingPolicy, NumericColumn, NumericEncoding};

/// Largest rolling-mean window offered to the user.
pub const MAX_ROLLING_WINDOW: usize = 20;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Default analysis parameters.
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Values handed through to the presentation layer.
    #[serde(default)]
    pub display: DisplaySettings,
}

impl Settings {
    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        self.analysis.validate()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when `RUST_LOG` is not set.
    #[serde(default)]
    pub level: LogLevel,

    /// Include the module path in log lines.
    #[serde(default = "default_true")]
    pub show_target: bool,
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            show_target: true,
        }
    }
}

/// Default analysis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// How sheets are merged.
    #[serde(default)]
    pub alignment: AlignmentMode,

    /// Largest lag for the lag correlation (1-100).
    #[serde(default = "default_max_lag")]
    pub max_lag: usize,

    /// Rolling-mean window in rows (1-20).
    #[serde(default = "default_rolling_window")]
    pub rolling_window: usize,

    /// Statistic used for the sheet comparison.
    #[serde(default)]
    pub group_stat: GroupStat,

    /// First column of the lag correlation.
    #[serde(default = "default_reference_column")]
    pub reference_column: NumericColumn,

    /// Second column of the lag correlation.
    #[serde(default = "default_comparison_column")]
    pub comparison_column: NumericColumn,

    /// Handling of missing quantity/metric cells.
    #[serde(default)]
    pub missing_policy: MissingPolicy,

    /// Interpretation of numeric timestamp cells.
    #[serde(default)]
    pub timestamp_encoding: NumericEncoding,
}

fn default_max_lag() -> usize {
    20
}

fn default_rolling_window() -> usize {
    5
}

fn default_reference_column() -> NumericColumn {
    NumericColumn::MetricA
}

fn default_comparison_column() -> NumericColumn {
    NumericColumn::MetricB
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            alignment: AlignmentMode::default(),
            max_lag: default_max_lag(),
            rolling_window: default_rolling_window(),
            group_stat: GroupStat::default(),
            reference_column: default_reference_column(),
            comparison_column: default_comparison_column(),
            missing_policy: MissingPolicy::default(),
            timestamp_encoding: NumericEncoding::default(),
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_LAG_LIMIT).contains(&self.max_lag) {
            return Err(format!(
                "analysis.max_lag must be between 1 and {}, got {}",
                MAX_LAG_LIMIT, self.max_lag
            ));
        }
        if !(1..=MAX_ROLLING_WINDOW).contains(&self.rolling_window) {
            return Err(format!(
                "analysis.rolling_window must be between 1 and {}, got {}",
                MAX_ROLLING_WINDOW, self.rolling_window
            ));
        }
        if self.reference_column == self.comparison_column {
            return Err(format!(
                "analysis.reference_column and analysis.comparison_column are both '{}'",
                self.reference_column
            ));
        }
        Ok(())
    }
}

/// Values handed through to the presentation layer.
///
/// The chart font is configuration, not something the core looks up on
/// the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplaySettings {
    /// Chart font family; unset means the renderer's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

/// Configuration section identifiers for atomic updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Logging,
    Analysis,
    Display,
}

impl ConfigSection {
    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Logging => "logging",
            ConfigSection::Analysis => "analysis",
            ConfigSection::Display => "display",
        }
    }

    /// Sections in file order.
    pub fn all() -> &'static [ConfigSection] {
        &[Self::Logging, Self::Analysis, Self::Display]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_serializes() {
        let settings = Settings::default();
        let toml = toml::to_string_pretty(&settings).unwrap();
        assert!(toml.contains("[analysis]"));
        assert!(toml.contains("[logging]"));
        assert!(toml.contains("alignment = \"unified_axis\""));
        assert!(!toml.contains("font_family"));
    }

    #[test]
    fn settings_round_trip() {
        let mut settings = Settings::default();
        settings.display.font_family = Some("NanumGothic".into());
        settings.analysis.group_stat = GroupStat::Max;
        let toml = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let minimal = "[analysis]\nmax_lag = 50\nalignment = \"raw_append\"";
        let parsed: Settings = toml::from_str(minimal).unwrap();
        assert_eq!(parsed.analysis.max_lag, 50);
        assert_eq!(parsed.analysis.alignment, AlignmentMode::RawAppend);
        assert_eq!(parsed.analysis.rolling_window, 5);
        assert_eq!(parsed.analysis.reference_column, NumericColumn::MetricA);
        assert_eq!(parsed.logging.level, LogLevel::Info);
        assert_eq!(parsed.display, DisplaySettings::default());
    }

    #[test]
    fn validation_rejects_out_of_range() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.analysis.max_lag = 101;
        assert!(settings.validate().unwrap_err().contains("max_lag"));

        settings.analysis.max_lag = 20;
        settings.analysis.rolling_window = 0;
        assert!(settings.validate().unwrap_err().contains("rolling_window"));

        settings.analysis.rolling_window = 5;
        settings.analysis.comparison_column = NumericColumn::MetricA;
        assert!(settings.validate().is_err());
    }
}

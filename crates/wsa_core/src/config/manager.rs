//! Settings file handling.
//!
//! The file is always replaced through a sibling temp file and a rename, so
//! a crash mid-write leaves the previous file intact. Saving one section
//! goes through `toml_edit` and leaves the rest of the document, comments
//! included, as it was on disk. Values are range-checked on every load and
//! before every write.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use toml_edit::{DocumentMut, Item};

use super::settings::{ConfigSection, Settings};

const FILE_BANNER: &str = "\
# Workbook sensor analysis settings
# Sections are rewritten one at a time; comments elsewhere are kept.
";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error on settings file: {0}")]
    Io(#[from] io::Error),

    #[error("Settings file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Cannot encode settings as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Cannot edit settings document: {0}")]
    Edit(#[from] toml_edit::TomlError),

    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),

    #[error("Invalid setting: {0}")]
    InvalidValue(String),
}

/// Result type for settings file operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Owns the settings file and the in-memory [`Settings`].
pub struct ConfigManager {
    config_path: PathBuf,
    settings: Settings,
}

impl ConfigManager {
    /// Nothing is read until [`load`](Self::load) or
    /// [`load_or_create`](Self::load_or_create).
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            settings: Settings::default(),
        }
    }

    /// Location of the settings file, whether or not it exists yet.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// The last loaded or edited settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Edits stay in memory until [`save`](Self::save) or
    /// [`update_section`](Self::update_section).
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Read and validate an existing file.
    pub fn load(&mut self) -> ConfigResult<()> {
        let content = self
            .read_existing()?
            .ok_or_else(|| ConfigError::NotFound(self.config_path.clone()))?;
        self.settings = parse_and_validate(&content)?;
        Ok(())
    }

    /// Like [`load`](Self::load), but a missing file is created from the
    /// defaults and a file lacking keys gets them written back.
    pub fn load_or_create(&mut self) -> ConfigResult<()> {
        match self.read_existing()? {
            Some(content) => {
                self.settings = parse_and_validate(&content)?;
                if needs_rewrite(&content, &self.settings)? {
                    tracing::debug!("Completing settings file {}", self.config_path.display());
                    self.save()?;
                }
            }
            None => {
                tracing::info!("Writing default settings to {}", self.config_path.display());
                self.settings = Settings::default();
                self.save()?;
            }
        }
        Ok(())
    }

    /// Replace the whole file with the in-memory settings.
    pub fn save(&self) -> ConfigResult<()> {
        self.settings.validate().map_err(ConfigError::InvalidValue)?;
        let mut document = String::from(FILE_BANNER);
        for &section in ConfigSection::all() {
            document.push_str(&format!(
                "\n# {}\n[{}]\n{}",
                section_comment(section),
                section.table_name(),
                self.section_toml(section)?
            ));
        }
        write_atomically(&self.config_path, &document)?;
        Ok(())
    }

    /// Write one section back; the rest of the on-disk document is untouched.
    pub fn update_section(&mut self, section: ConfigSection) -> ConfigResult<()> {
        self.settings.validate().map_err(ConfigError::InvalidValue)?;

        let mut doc = match self.read_existing()? {
            Some(content) if !content.trim().is_empty() => content.parse::<DocumentMut>()?,
            _ => DocumentMut::new(),
        };
        let fresh: DocumentMut = self.section_toml(section)?.parse()?;
        doc[section.table_name()] = Item::Table(fresh.as_table().clone());

        write_atomically(&self.config_path, &doc.to_string())?;
        tracing::debug!("Updated [{}] in {}", section.table_name(), self.config_path.display());
        Ok(())
    }

    fn read_existing(&self) -> ConfigResult<Option<String>> {
        match fs::read_to_string(&self.config_path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn section_toml(&self, section: ConfigSection) -> ConfigResult<String> {
        let body = match section {
            ConfigSection::Logging => toml::to_string_pretty(&self.settings.logging)?,
            ConfigSection::Analysis => toml::to_string_pretty(&self.settings.analysis)?,
            ConfigSection::Display => toml::to_string_pretty(&self.settings.display)?,
        };
        Ok(body)
    }
}

fn section_comment(section: ConfigSection) -> &'static str {
    match section {
        ConfigSection::Logging => "Log level and format",
        ConfigSection::Analysis => "Defaults for new analysis requests",
        ConfigSection::Display => "Passed through to the report for rendering",
    }
}

/// Temp file in the same directory, fsync, then rename over the target.
fn write_atomically(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("toml.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    drop(file);
    fs::rename(&temp_path, path)
}

fn parse_and_validate(content: &str) -> ConfigResult<Settings> {
    let settings: Settings = toml::from_str(content)?;
    settings.validate().map_err(ConfigError::InvalidValue)?;
    Ok(settings)
}

/// Whether the file has unknown sections or lacks keys the settings carry.
fn needs_rewrite(content: &str, settings: &Settings) -> ConfigResult<bool> {
    let on_disk: toml::Table = toml::from_str(content)?;
    let expected: toml::Table = toml::from_str(&toml::to_string(settings)?)?;

    let unknown_section = on_disk
        .keys()
        .any(|k| !ConfigSection::all().iter().any(|s| s.table_name() == k));

    let missing_key = expected.iter().any(|(name, table)| {
        match (on_disk.get(name).and_then(|v| v.as_table()), table.as_table()) {
            (Some(disk), Some(wanted)) => wanted.keys().any(|k| !disk.contains_key(k)),
            _ => true,
        }
    });

    Ok(unknown_section || missing_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AlignmentMode, GroupStat};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn first_run_writes_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join(".config").join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert!(config_path.exists());
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[analysis]"));
        assert!(content.contains("[logging]"));
        assert!(content.contains("[display]"));

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings(), &Settings::default());
    }

    #[test]
    fn custom_values_survive_completion() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        fs::write(&config_path, "[analysis]\nmax_lag = 40\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        assert_eq!(manager.settings().analysis.max_lag, 40);
        // Defaults were written back next to the custom value
        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("max_lag = 40"));
        assert!(content.contains("rolling_window = 5"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");
        fs::write(&config_path, "[analysis]\nrolling_window = 50\n").unwrap();

        let mut manager = ConfigManager::new(&config_path);
        assert!(matches!(manager.load(), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let mut manager = ConfigManager::new(dir.path().join("absent.toml"));
        assert!(matches!(manager.load(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn update_section_only_changes_target() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");
        fs::write(
            &config_path,
            "# keep me\n[display]\nfont_family = \"NanumGothic\"\n\n[analysis]\nmax_lag = 10\n",
        )
        .unwrap();

        let mut manager = ConfigManager::new(&config_path);
        manager.load().unwrap();
        manager.settings_mut().analysis.group_stat = GroupStat::Std;
        manager.settings_mut().analysis.alignment = AlignmentMode::SheetKeyed;
        manager.settings_mut().display.font_family = None;
        manager.update_section(ConfigSection::Analysis).unwrap();

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("# keep me"));
        assert!(content.contains("group_stat = \"std\""));
        assert!(content.contains("alignment = \"sheet_keyed\""));
        // Display was not written, so the on-disk font survives
        assert!(content.contains("font_family = \"NanumGothic\""));
    }

    #[test]
    fn update_section_refuses_invalid_settings() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");
        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        manager.settings_mut().analysis.max_lag = 0;
        assert!(manager.update_section(ConfigSection::Analysis).is_err());

        let mut reloaded = ConfigManager::new(&config_path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.settings().analysis.max_lag, 20);
    }

    #[test]
    fn no_temp_file_left_behind() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("settings.toml");

        let mut manager = ConfigManager::new(&config_path);
        manager.load_or_create().unwrap();

        let temp_path = config_path.with_extension("toml.tmp");
        assert!(!temp_path.exists());
    }
}

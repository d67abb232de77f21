//! # Framework Settings
//!
//! Settings that control the framework rather than any single mod: where
//! mod config files live, which format they are written in, and how
//! verbose logging is.
//!
//! Settings files are plain serde structures. The format is chosen from the
//! file extension, TOML (`.toml`) or RON (`.ron`).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File extensions understood by [`SettingsFile`] and the mod configuration backend
pub const SUPPORTED_EXTENSIONS: [&str; 2] = ["toml", "ron"];

/// Settings file trait
pub trait SettingsFile: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load settings from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension_of(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| SettingsError::Parse(e.to_string())),
            _ => Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Load settings from file, or fall back to defaults if the file does not exist
    fn load_or_default(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load_from_file(path)
        } else {
            log::debug!("No settings file at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save settings to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let contents = match extension_of(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| SettingsError::Serialize(e.to_string()))?,
            _ => return Err(SettingsError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

pub(crate) fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Settings errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Settings failed validation
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// # Core Settings
///
/// Framework-wide behavior: logging and the location and format of the
/// per-mod config files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreSettings {
    /// Fallback log level when `RUST_LOG` is not set
    pub log_level: String,
    /// Directory that holds one config file per mod
    pub config_dir: PathBuf,
    /// Extension (and therefore format) of mod config files
    pub config_extension: String,
}

impl CoreSettings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            config_dir: PathBuf::from("config"),
            config_extension: "toml".to_string(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the config directory
    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    /// Set the config file extension
    pub fn with_config_extension(mut self, extension: impl Into<String>) -> Self {
        self.config_extension = extension.into();
        self
    }

    /// Path of the config file for a mod
    pub fn config_path(&self, mod_id: &str) -> PathBuf {
        self.config_dir.join(format!("{mod_id}.{}", self.config_extension))
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !SUPPORTED_EXTENSIONS.contains(&self.config_extension.as_str()) {
            return Err(SettingsError::Invalid(format!(
                "config extension must be one of {:?}, got '{}'",
                SUPPORTED_EXTENSIONS, self.config_extension
            )));
        }

        if self.log_level.parse::<log::LevelFilter>().is_err() {
            return Err(SettingsError::Invalid(format!("unknown log level '{}'", self.log_level)));
        }

        Ok(())
    }
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsFile for CoreSettings {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_are_valid() {
        let settings = CoreSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.config_path("examplemod"), PathBuf::from("config").join("examplemod.toml"));
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let settings = CoreSettings::new().with_config_extension("cfg");
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        let settings = CoreSettings::new().with_log_level("loud");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_save_and_load_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let settings = CoreSettings::new()
            .with_log_level("debug")
            .with_config_dir("mods/config")
            .with_config_extension("ron");

        for name in ["core.toml", "core.ron"] {
            let path = dir.path().join(name);
            settings.save_to_file(&path).unwrap();
            let loaded = CoreSettings::load_from_file(&path).unwrap();
            assert_eq!(loaded, settings);
        }
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = CoreSettings::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, CoreSettings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core.toml");
        std::fs::write(&path, "log_level = \"warn\"\n").unwrap();

        let loaded = CoreSettings::load_from_file(&path).unwrap();
        assert_eq!(loaded.log_level, "warn");
        assert_eq!(loaded.config_extension, "toml");
    }

    #[test]
    fn test_unsupported_format_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let result = CoreSettings::default().save_to_file(dir.path().join("core.json"));
        assert!(matches!(result, Err(SettingsError::UnsupportedFormat(_))));
    }
}

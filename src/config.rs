use crate::planner::{self, DEFAULT_MIN_FILES};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub organize: OrganizeSettings,

    #[serde(default)]
    pub window: WindowSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizeSettings {
    /// Minimum files of one type before a folder is created
    #[serde(default = "default_min_files")]
    pub min_files: usize,

    /// Write a zip snapshot before moving anything
    #[serde(default = "default_create_backup")]
    pub create_backup: bool,

    /// Pause after each move so progress stays readable; 0 disables it
    #[serde(default = "default_pace_ms")]
    pub pace_ms: u64,
}

/// Opaque window state kept for front ends that have one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSettings {
    #[serde(default)]
    pub geometry: Vec<u8>,
}

impl Default for OrganizeSettings {
    fn default() -> Self {
        Self {
            min_files: default_min_files(),
            create_backup: default_create_backup(),
            pace_ms: default_pace_ms(),
        }
    }
}

fn default_min_files() -> usize { DEFAULT_MIN_FILES }
fn default_create_backup() -> bool { true }
fn default_pace_ms() -> u64 { 50 }

impl Config {
    /// Get the config file path, e.g. ~/.config/typefold/config.toml
    pub fn config_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "typefold")
            .context("Could not determine a configuration directory")?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Load config from the default location or return defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Ok(path) if path.exists() => match Self::load_from(&path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: {:#}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        config.organize.min_files = planner::clamp_threshold(config.organize.min_files);
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let toml = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, toml).context("Failed to write config file")?;

        Ok(())
    }

    /// Apply CLI option overrides
    pub fn apply_cli_overrides(&mut self, min_files: Option<usize>, create_backup: Option<bool>) {
        if let Some(n) = min_files {
            self.organize.min_files = planner::clamp_threshold(n);
        }
        if let Some(backup) = create_backup {
            self.organize.create_backup = backup;
        }
    }

    pub fn pace(&self) -> Option<Duration> {
        match self.organize.pace_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.organize.min_files, 2);
        assert!(config.organize.create_backup);
        assert_eq!(config.pace(), Some(Duration::from_millis(50)));
        assert!(config.window.geometry.is_empty());
    }

    #[test]
    fn test_config_apply_cli_overrides() {
        let mut config = Config::default();
        config.apply_cli_overrides(Some(5), Some(false));

        assert_eq!(config.organize.min_files, 5);
        assert!(!config.organize.create_backup);
    }

    #[test]
    fn test_config_partial_overrides_and_clamping() {
        let mut config = Config::default();
        config.apply_cli_overrides(Some(0), None);
        assert_eq!(config.organize.min_files, 1);
        assert!(config.organize.create_backup);

        config.apply_cli_overrides(Some(1000), None);
        assert_eq!(config.organize.min_files, planner::MAX_THRESHOLD);
    }

    #[test]
    fn test_config_round_trip_keeps_geometry() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.organize.min_files = 4;
        config.organize.pace_ms = 0;
        config.window.geometry = vec![1, 208, 0, 255];
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.pace(), None);
    }

    #[test]
    fn test_config_partial_file_uses_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "[organize]\nmin_files = 3\n").unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.organize.min_files, 3);
        assert!(loaded.organize.create_backup);
        assert_eq!(loaded.organize.pace_ms, 50);
    }

    #[test]
    fn test_config_invalid_file_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, "organize = [").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}

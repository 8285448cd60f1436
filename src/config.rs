//! Configuration loading and management
//!
//! Handles parsing of `.projman.toml` configuration files. Lookup order:
//! an explicit path, `.projman.toml` in the working directory, then
//! `config.toml` in the platform configuration directory.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = ".projman.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Where the store lives
    #[serde(default)]
    pub store: StoreConfig,

    /// Human output settings
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Store-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Path to the store file; relative paths resolve against the working
    /// directory
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("data").join("users.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Display-related configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    /// strftime-style format used when printing due dates
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Descriptions longer than this are truncated in listings
    #[serde(default = "default_description_width")]
    pub description_width: usize,
}

fn default_date_format() -> String {
    "%B %d, %Y".to_string()
}

fn default_description_width() -> usize {
    50
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            description_width: default_description_width(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for a run.
    ///
    /// An explicit path must exist. Otherwise the first of the local and
    /// global config files that exists is loaded, falling back to defaults.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load(&local);
        }

        if let Some(global) = global_config_path() {
            if global.is_file() {
                return Self::load(&global);
            }
        }

        Ok(Self::default())
    }

    /// Store path, resolved against `cwd` when relative.
    pub fn store_path(&self, cwd: &Path) -> PathBuf {
        if self.store.path.is_absolute() {
            self.store.path.clone()
        } else {
            cwd.join(&self.store.path)
        }
    }

    fn validate(&self) -> Result<()> {
        if self.store.path.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("store.path cannot be empty".to_string()));
        }
        if self.display.date_format.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "display.date_format cannot be empty".to_string(),
            ));
        }
        if self.display.description_width < 4 {
            return Err(Error::InvalidConfig(format!(
                "display.description_width: {} is too small (minimum 4)",
                self.display.description_width
            )));
        }
        Ok(())
    }
}

/// `config.toml` inside the platform configuration directory, if one can be
/// determined.
pub fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "projman")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

//! TOML-based configuration.
//!
//! Stored at `~/.config/toki/config.toml`, or wherever `TOKI_CONFIG` points.
//! Every key is optional; command-line flags take precedence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::view::{DisplayOptions, TimeFormat, DEFAULT_MAX_WIDTH, DEFAULT_PADDING};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "TOKI_CONFIG";

/// Display configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// `24h` or `kitchen`.
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default)]
    pub fullscreen: bool,
    #[serde(default = "default_max_width")]
    pub max_width: u16,
    #[serde(default = "default_padding")]
    pub padding: u16,
}

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_format() -> String {
    "kitchen".into()
}
fn default_max_width() -> u16 {
    DEFAULT_MAX_WIDTH
}
fn default_padding() -> u16 {
    DEFAULT_PADDING
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            fullscreen: false,
            max_width: default_max_width(),
            padding: default_padding(),
        }
    }
}

/// Returns `~/.config/toki/`.
///
/// # Errors
///
/// Returns [`ConfigError::NoConfigDir`] if the home directory is unknown.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".config").join("toki"))
        .ok_or(ConfigError::NoConfigDir)
}

impl Config {
    /// Config file location, honouring `TOKI_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns an error if no config directory can be determined.
    pub fn path() -> Result<PathBuf, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Ok(config_dir()?.join("config.toml")),
        }
    }

    /// Load from the default location, or return defaults if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, or return defaults if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "loaded configuration");
                Ok(toml::from_str(&content)?)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Persist to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = self.to_toml().map_err(save_failed)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| save_failed(e.to_string()))?;
        }
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Render as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns the serializer's message on failure.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| e.to_string())
    }

    /// Merge command-line flags over the configured display settings.
    ///
    /// `format` of `None` means the flag was not given.
    pub fn display_options(
        &self,
        name: Option<&str>,
        fullscreen: bool,
        format: Option<&str>,
    ) -> DisplayOptions {
        DisplayOptions {
            name: name.unwrap_or_default().to_string(),
            fullscreen: fullscreen || self.display.fullscreen,
            time_format: TimeFormat::from_flag(format.unwrap_or(self.display.format.as_str())),
            max_width: self.display.max_width,
            padding: self.display.padding,
        }
    }
}

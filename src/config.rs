use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PluginVersionError, Result};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "plugin-version.toml";

/// Represents the complete configuration for plugin-version.
///
/// Contains plugin layout settings, behavior options and any extra target
/// files that mirror the version string.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub plugin: PluginConfig,

    #[serde(default)]
    pub behavior: BehaviorConfig,

    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

fn default_source_path() -> PathBuf {
    PathBuf::from("src")
}

fn default_version_constant() -> String {
    "VERSION".to_string()
}

/// Layout of the plugin being versioned.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct PluginConfig {
    /// Plugin slug. Derived from `composer.json` when absent.
    #[serde(default)]
    pub name: Option<String>,

    /// Directory holding the plugin sources, relative to the project root.
    #[serde(default = "default_source_path")]
    pub source_path: PathBuf,

    /// Name of the PHP constant carrying the version.
    #[serde(default = "default_version_constant")]
    pub version_constant: String,
}

impl Default for PluginConfig {
    fn default() -> Self {
        PluginConfig {
            name: None,
            source_path: default_source_path(),
            version_constant: default_version_constant(),
        }
    }
}

/// What to do when a target file exists but carries no version marker.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MissingMarkerPolicy {
    /// Report the file as skipped.
    #[default]
    Skip,
    /// Report the file as skipped and emit a warning.
    Warn,
    /// Report the file as failed.
    Error,
}

/// Configuration for behavior customization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct BehaviorConfig {
    #[serde(default)]
    pub missing_marker: MissingMarkerPolicy,
}

/// An extra file that mirrors the version string.
///
/// `pattern` locates the token. With two capture groups the groups are kept as
/// prefix and suffix; with one group it is kept as the prefix. `replacement`
/// overrides that default and may use `{version}` plus regex group references.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TargetConfig {
    /// Path relative to the plugin source directory.
    pub path: PathBuf,

    pub pattern: String,

    #[serde(default)]
    pub replacement: Option<String>,

    #[serde(default)]
    pub stable_only: bool,
}

impl Config {
    /// Checks settings that would otherwise only fail halfway through a run.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.plugin.name {
            if name.trim().is_empty() {
                return Err(PluginVersionError::config("plugin.name must not be empty"));
            }
        }

        if self.plugin.version_constant.trim().is_empty() {
            return Err(PluginVersionError::config(
                "plugin.version_constant must not be empty",
            ));
        }

        for target in &self.targets {
            regex::bytes::Regex::new(&target.pattern).map_err(|e| {
                PluginVersionError::config(format!(
                    "target '{}' has an invalid pattern: {}",
                    target.path.display(),
                    e
                ))
            })?;
        }

        Ok(())
    }
}

/// Parses configuration from a TOML string and validates it.
pub fn parse_config(config_str: &str) -> Result<Config> {
    let config: Config = toml::from_str(config_str)
        .map_err(|e| PluginVersionError::config(format!("invalid TOML: {}", e)))?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `plugin-version.toml` in the current directory
/// 3. `.plugin-version.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                return Err(PluginVersionError::file_not_found(path));
            }
            Some(path.to_path_buf())
        }
        None => find_config_file(),
    };

    match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            parse_config(&fs::read_to_string(&path)?)
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn find_config_file() -> Option<PathBuf> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

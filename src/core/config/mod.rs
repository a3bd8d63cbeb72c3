//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Values are resolved in this order (later overrides earlier):
//! 1. Default values (`!` prefix, case-insensitive names)
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. The explicit path passed to [`Config::load`]
//! 2. `$ARMADA_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/armada/config.toml`
//! 4. `~/.armada/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use armada::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Prefix: {}", config.prefix());
//! println!("Case-insensitive: {}", config.case_insensitive());
//! ```

pub mod schema;

pub use schema::ArmadaConfig;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default prefix when none is configured.
pub const DEFAULT_PREFIX: &str = "!";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// The file contents (all fields optional)
    pub file: ArmadaConfig,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Wrap already parsed file contents.
    pub fn from_file(file: ArmadaConfig) -> Config {
        Config { file, path: None }
    }

    /// Load configuration from `explicit` or the default locations.
    ///
    /// # Errors
    ///
    /// Returns an error if the explicit path cannot be read, or if a config
    /// file exists but cannot be parsed or fails validation. Missing
    /// default-location files are not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::discover() {
            Some(path) => Self::load_from(&path),
            None => Ok(Config::default()),
        }
    }

    /// Load and validate a specific config file.
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: ArmadaConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Find the first existing config file in the default locations.
    fn discover() -> Option<PathBuf> {
        // 1. Check $ARMADA_CONFIG
        if let Ok(path) = std::env::var("ARMADA_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/armada/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("armada/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.armada/config.toml
        dirs::home_dir()
            .map(|home| home.join(".armada/config.toml"))
            .filter(|path| path.exists())
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed, writes to a temp file in the
    /// same directory, then renames it over `path`.
    pub fn write(path: &Path, config: &ArmadaConfig) -> Result<(), ConfigError> {
        config.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(config).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        file.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        file.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the default prefix.
    ///
    /// Defaults to `!` if not configured.
    pub fn prefix(&self) -> &str {
        self.file.prefix.as_deref().unwrap_or(DEFAULT_PREFIX)
    }

    /// Check if command names are case-insensitive.
    ///
    /// Defaults to `true` if not configured.
    pub fn case_insensitive(&self) -> bool {
        self.file.case_insensitive.unwrap_or(true)
    }

    /// Iterate over routing-key prefixes.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.file
            .prefixes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

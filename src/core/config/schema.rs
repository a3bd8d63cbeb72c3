//! core::config::schema
//!
//! Configuration schema types.
//!
//! # File
//!
//! Located at (in order of precedence):
//! 1. An explicit `--config` path
//! 2. `$ARMADA_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/armada/config.toml`
//! 4. `~/.armada/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Prefixes must be non-empty and must not contain whitespace, otherwise
//! no command could ever be split from its prefix.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Dispatcher configuration as stored on disk.
///
/// # Example
///
/// ```toml
/// prefix = "!"
/// case_insensitive = true
///
/// [prefixes]
/// admin = "?"
/// ops = "ops:"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ArmadaConfig {
    /// Default command prefix
    pub prefix: Option<String>,

    /// Fold command names and aliases to lowercase
    pub case_insensitive: Option<bool>,

    /// Prefixes per routing key
    pub prefixes: BTreeMap<String, String>,
}

impl ArmadaConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any prefix is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.prefix {
            validate_prefix("prefix", prefix)?;
        }
        for (key, prefix) in &self.prefixes {
            validate_prefix(&format!("prefixes.{}", key), prefix)?;
        }
        Ok(())
    }
}

fn validate_prefix(field: &str, prefix: &str) -> Result<(), ConfigError> {
    if prefix.is_empty() {
        return Err(ConfigError::InvalidValue(format!(
            "{} cannot be empty",
            field
        )));
    }
    if prefix.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidValue(format!(
            "{} '{}' cannot contain whitespace",
            field, prefix
        )));
    }
    Ok(())
}

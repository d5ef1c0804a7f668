//! Settings for alias limits and expansion behaviour.
//!
//! Settings live in `~/.shalias/settings.json`. Every field is optional; a
//! missing file or a missing field falls back to the defaults below.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum number of characters kept in an alias key.
pub const MAX_ALIAS_KEY_LENGTH: usize = 50;

/// Maximum number of characters kept in a resolved alias value.
pub const MAX_ALIAS_VALUE_LENGTH: usize = 200;

/// Upper bound on expansion passes in fixed-point mode.
pub const DEFAULT_MAX_PASSES: usize = 16;

/// What to do with keys or values longer than their limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    /// Cut the text at the limit and log a warning.
    #[default]
    Truncate,
    /// Refuse the definition.
    Reject,
}

/// How many times the expander walks the alias table per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExpansionMode {
    /// One forward pass over the aliases in definition order.
    #[default]
    SinglePass,
    /// Repeat passes until nothing changes, up to `max_passes`.
    FixedPoint { max_passes: usize },
}

impl ExpansionMode {
    pub fn fixed_point() -> Self {
        ExpansionMode::FixedPoint {
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    pub(crate) fn max_passes(self) -> usize {
        match self {
            ExpansionMode::SinglePass => 1,
            ExpansionMode::FixedPoint { max_passes } => max_passes.max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub max_key_len: usize,
    pub max_value_len: usize,
    pub truncation: Truncation,
    pub expansion: ExpansionMode,
    /// Seed a `~` alias pointing at the home directory when a session starts.
    pub home_alias: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_key_len: MAX_ALIAS_KEY_LENGTH,
            max_value_len: MAX_ALIAS_VALUE_LENGTH,
            truncation: Truncation::default(),
            expansion: ExpansionMode::default(),
            home_alias: true,
        }
    }
}

impl Settings {
    /// Location of the settings file under the user's home directory.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let mut path = PathBuf::from(home_dir()?);
        path.push(".shalias");
        path.push("settings.json");
        Ok(path)
    }

    /// Loads settings from `path`, or returns the defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The current user's home directory, from `HOME` (`USERPROFILE` on Windows).
pub fn home_dir() -> Result<String, ConfigError> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var(var).map_err(|_| ConfigError::MissingHome(var))
}

//! Runtime configuration.
//!
//! Everything has a default, so a config file only needs the keys it wants
//! to change:
//!
//! ```json
//! { "players": 3, "topology": { "shape": "wheel", "size": 8 } }
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::game::{DEFAULT_OVERFLOW_LIMIT, MAX_PLAYERS};
use crate::topology::Topology;

/// Error loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that was requested.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not valid JSON for a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Rules applied to every move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Worklist pops allowed per move before the cascade is abandoned.
    pub overflow_limit: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            overflow_limit: DEFAULT_OVERFLOW_LIMIT,
        }
    }
}

/// Defaults for a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Rules in force.
    pub rules: Rules,
    /// Number of players.
    pub players: usize,
    /// Board to play on.
    pub topology: Topology,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: Rules::default(),
            players: 2,
            topology: Topology::Rect {
                width: 5,
                height: 5,
            },
        }
    }
}

impl Config {
    /// Parse and validate a config from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid config.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Check that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 || self.players > MAX_PLAYERS {
            return Err(ConfigError::Invalid(format!(
                "players must be between 1 and {MAX_PLAYERS}, got {}",
                self.players
            )));
        }
        if self.rules.overflow_limit == 0 {
            return Err(ConfigError::Invalid(
                "rules.overflow_limit must be positive".to_string(),
            ));
        }
        self.topology
            .check()
            .map_err(|err| ConfigError::Invalid(err.to_string()))
    }
}

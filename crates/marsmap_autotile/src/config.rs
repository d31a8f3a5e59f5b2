//! Autotile configuration
//!
//! Controls how strictly the terrain resolver matches corners. The default is
//! exact matching; nearest matching must be opted into.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or saving an [`AutotileConfig`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Corner matching policy for [`TerrainResolver`](crate::TerrainResolver)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// All four corners must match; otherwise resolution fails
    #[default]
    Exact,
    /// Degraded mode: fall back to the tile with the fewest mismatched corners
    Nearest,
}

/// Autotile settings, usually read from a TOML file
///
/// ```toml
/// match_mode = "nearest"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutotileConfig {
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl AutotileConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with the degraded nearest-match mode enabled
    pub fn nearest() -> Self {
        Self {
            match_mode: MatchMode::Nearest,
        }
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

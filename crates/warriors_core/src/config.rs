use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::Resource;
use serde::Deserialize;
use thiserror::Error;

use crate::health::{HealthConfig, HealthError};

const DEFAULT_LEVEL_NAME: &str = "ThirdPersonExampleMap";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error(transparent)]
    Invalid(#[from] HealthError),
}

/// Everything a host needs to start the game. Missing sections fall back to defaults.
#[derive(Resource, Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub health: HealthConfig,
    pub level: LevelSettings,
}

impl GameConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&data)
    }

    pub fn from_toml(data: &str) -> Result<Self, ConfigError> {
        let cfg: GameConfig = toml::from_str(data)?;
        cfg.health.validate()?;
        Ok(cfg)
    }

    /// Applies `WARRIORS_LEVEL` on top of whatever was loaded.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(name) = std::env::var("WARRIORS_LEVEL")
            .ok()
            .filter(|val| !val.trim().is_empty())
        {
            self.level.name = name;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelSettings {
    pub name: String,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            name: DEFAULT_LEVEL_NAME.to_string(),
        }
    }
}

//! Query settings: built-in defaults, an optional TOML file, then
//! environment variables and flags (clap folds those two together).

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use roadnet_core::{DelayModel, DelayModelError, NodeId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MAX_MEMORY_MB: u32 = 4096;
pub const MIN_MAX_MEMORY_MB: u32 = 1;
pub const MAX_MAX_MEMORY_MB: u32 = 131_072; // 128 GB

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("max_memory_mb must be between 1 and 131072, got {0}")]
    MaxMemory(u32),
    #[error(transparent)]
    Delay(#[from] DelayModelError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Start node. Defaults to 0.
    pub source: Option<NodeId>,
    /// Destination node. Defaults to the last node.
    pub destination: Option<NodeId>,
    pub delay: DelayModel,
    pub format: OutputFormat,
    /// Refuse to query graphs larger than this.
    pub max_memory_mb: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source: None,
            destination: None,
            delay: DelayModel::default(),
            format: OutputFormat::default(),
            max_memory_mb: DEFAULT_MAX_MEMORY_MB,
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub source: Option<NodeId>,
    pub destination: Option<NodeId>,
    pub delay: Option<DelayModel>,
    pub format: Option<OutputFormat>,
    pub max_memory_mb: Option<u32>,
}

impl Settings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Defaults, then `file` if given, then `overrides`; validated.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self, ConfigError> {
        let mut settings = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply(overrides);
        settings.validate()?;
        Ok(settings)
    }

    pub fn apply(&mut self, overrides: Overrides) {
        if overrides.source.is_some() {
            self.source = overrides.source;
        }
        if overrides.destination.is_some() {
            self.destination = overrides.destination;
        }
        if let Some(delay) = overrides.delay {
            self.delay = delay;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
        if let Some(mb) = overrides.max_memory_mb {
            self.max_memory_mb = mb;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_MAX_MEMORY_MB..=MAX_MAX_MEMORY_MB).contains(&self.max_memory_mb) {
            return Err(ConfigError::MaxMemory(self.max_memory_mb));
        }
        self.delay.validate()?;
        Ok(())
    }
}

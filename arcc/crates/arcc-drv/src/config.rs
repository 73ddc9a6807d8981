//! Channel table configuration.
//!
//! The analyzer resolves channel names through a host table. The driver
//! reads it from a TOML file:
//!
//! ```toml
//! [channels.valve]
//! id = 100
//! type = "f64"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use arcc_lex::PrimitiveType;
use arcc_sem::{Channels, Type};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Driver configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Channels visible to every checked program, keyed by name.
    #[serde(default)]
    pub channels: BTreeMap<String, ChannelConfig>,
}

/// One entry of the channel table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChannelConfig {
    /// Host channel id.
    pub id: u32,

    /// Element type name (`i8` .. `u64`, `f32`, `f64`, `str`).
    #[serde(rename = "type")]
    pub ty: String,
}

impl Config {
    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })
    }

    /// Parse configuration text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: Default::default(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Builder-style channel insertion, mostly for tests and embedding.
    pub fn with_channel(mut self, name: impl Into<String>, id: u32, ty: impl Into<String>) -> Self {
        self.channels.insert(name.into(), ChannelConfig { id, ty: ty.into() });
        self
    }

    /// Check type names and id uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut ids: BTreeMap<u32, &str> = BTreeMap::new();
        for (name, channel) in &self.channels {
            channel_type(name, &channel.ty)?;
            if let Some(first) = ids.insert(channel.id, name) {
                return Err(ConfigError::DuplicateId {
                    id: channel.id,
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// The channel table handed to the analyzer.
    pub fn channels(&self) -> Result<Channels, ConfigError> {
        self.validate()?;
        let mut channels = Channels::new();
        for (name, channel) in &self.channels {
            channels.insert(name.clone(), channel.id, channel_type(name, &channel.ty)?);
        }
        Ok(channels)
    }
}

fn channel_type(channel: &str, name: &str) -> Result<Type, ConfigError> {
    PrimitiveType::from_name(name)
        .map(Type::from_primitive)
        .ok_or_else(|| ConfigError::UnknownType {
            channel: channel.to_string(),
            ty: name.to_string(),
        })
}

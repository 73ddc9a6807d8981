//! Error types for the driver.
//!
//! Problems in the checked programs are diagnostics, not errors. These
//! types cover what stops the driver from checking at all.

use std::path::PathBuf;

use thiserror::Error;

/// Errors loading the channel table.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or has the wrong shape.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A channel names a type the analyzer does not know.
    #[error("channel {channel} has unknown type {ty}")]
    UnknownType { channel: String, ty: String },

    /// Two channels share an id.
    #[error("channels {first} and {second} share id {id}")]
    DuplicateId { id: u32, first: String, second: String },
}

/// Errors from the driver.
#[derive(Error, Debug)]
pub enum DrvError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A source file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

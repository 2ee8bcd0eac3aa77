//! Configuration system
//!
//! Scenes are described in TOML or RON files and loaded through the
//! [`Config`] trait; the file extension selects the format.

mod scene;

pub use scene::{ControllerDesc, DomainDesc, EmitterDesc, Scene, SceneConfig};
pub use serde::{Deserialize, Serialize};

use std::path::Path;

use crate::controller::ControllerError;
use crate::domain::DomainError;

/// Serialization formats understood by [`Config`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Ron,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let contents = std::fs::read_to_string(path)?;
        parse(&contents, format)
    }

    /// Save configuration to file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::from_path(path)? {
            Format::Toml => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Parse configuration from TOML text
    fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        parse(contents, Format::Toml)
    }

    /// Parse configuration from RON text
    fn from_ron_str(contents: &str) -> Result<Self, ConfigError> {
        parse(contents, Format::Ron)
    }
}

fn parse<T: for<'de> Deserialize<'de>>(contents: &str, format: Format) -> Result<T, ConfigError> {
    match format {
        Format::Toml => toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
        Format::Ron => ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string())),
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A controller refers to a domain that was not declared
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// A declared domain has invalid parameters
    #[error("Invalid domain `{name}`: {source}")]
    Domain {
        /// Name the domain was declared under
        name: String,
        /// What was wrong with it
        #[source]
        source: DomainError,
    },

    /// A controller has invalid parameters
    #[error("Invalid controller: {0}")]
    Controller(#[from] ControllerError),

    /// A scene-level setting is out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

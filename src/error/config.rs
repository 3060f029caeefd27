/// Profile loading error types
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Unknown profile '{name}', available: {available:?}")]
    UnknownProfile { name: String, available: Vec<String> },
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Missing secret: {0}")]
    MissingSecret(String),
}

impl ConfigError {
    /// Create a new Invalid error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    /// Create a new MissingSecret error
    pub fn missing_secret(what: impl Into<String>) -> Self {
        Self::MissingSecret(what.into())
    }
}

/// Result type alias for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

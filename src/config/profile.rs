//! Named run profiles loaded from a TOML file

use super::constants;
use crate::error::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Column names used to read and tag the datasets
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    /// Identifier column of the reference dataset
    pub reference: String,
    /// Subject identifier column of every primary batch
    pub subject: String,
    /// Column added to (or replaced in) each batch with the literal indicator
    pub indicator: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            reference: constants::DEFAULT_REFERENCE_COLUMN.to_string(),
            subject: constants::DEFAULT_SUBJECT_COLUMN.to_string(),
            indicator: constants::DEFAULT_INDICATOR_COLUMN.to_string(),
        }
    }
}

/// SMTP transport settings for the end-of-run notification
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailSettings {
    pub to: String,
    pub from: String,
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_user: String,
    #[serde(default)]
    pub smtp_password: Option<String>,
    /// Name of an environment variable holding the password; wins over `smtp_password`
    #[serde(default)]
    pub smtp_password_env: Option<String>,
}

fn default_smtp_port() -> u16 {
    constants::DEFAULT_SMTP_PORT
}

impl EmailSettings {
    /// Resolve the SMTP password from the environment or the profile
    pub fn password(&self) -> ConfigResult<String> {
        if let Some(var) = &self.smtp_password_env {
            return std::env::var(var)
                .map_err(|_| ConfigError::missing_secret(format!("environment variable {var}")));
        }
        self.smtp_password
            .clone()
            .ok_or_else(|| ConfigError::missing_secret("smtp_password"))
    }
}

/// One named profile: where to read, where to write, how to notify
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub reference_path: PathBuf,
    pub batch_root: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default = "default_tracker_path")]
    pub tracker_path: PathBuf,
    #[serde(default)]
    pub columns: ColumnMapping,
    /// Sort enumerated batches lexically. Off by default: traversal order is used as-is.
    #[serde(default)]
    pub sort_batches: bool,
    /// Only enumerate files with these extensions. Empty means every file.
    #[serde(default)]
    pub batch_extensions: Vec<String>,
    #[serde(default)]
    pub email: Option<EmailSettings>,
}

fn default_tracker_path() -> PathBuf {
    PathBuf::from(constants::TRACKER_FILE)
}

impl Profile {
    fn validate(&self, name: &str) -> ConfigResult<()> {
        let columns = &self.columns;
        for (field, value) in [
            ("reference", &columns.reference),
            ("subject", &columns.subject),
            ("indicator", &columns.indicator),
        ] {
            if value.is_empty() {
                return Err(ConfigError::invalid(format!(
                    "profile '{name}': column '{field}' must not be empty"
                )));
            }
        }
        if columns.indicator == columns.subject {
            return Err(ConfigError::invalid(format!(
                "profile '{name}': indicator column would overwrite subject column '{}'",
                columns.subject
            )));
        }
        Ok(())
    }
}

/// Profile file contents
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    profiles: BTreeMap<String, Profile>,
}

impl Config {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config file {:?}", path);
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(content)?;
        for (name, profile) in &config.profiles {
            profile.validate(name)?;
        }
        Ok(config)
    }

    /// Select a profile by name
    pub fn profile(&self, name: &str) -> ConfigResult<&Profile> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                name: name.to_string(),
                available: self.profile_names().map(str::to_string).collect(),
            })
    }

    pub fn profile_names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }
}

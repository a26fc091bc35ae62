//! Validated runtime configuration.

use harbor_core::{SchemaVersion, VersionError};
use std::path::PathBuf;

/// Configuration error, fatal at startup
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Empty tools path
    #[error("tools path must not be empty")]
    EmptyToolsPath,

    /// Minimum version does not parse
    #[error("invalid --min-version '{value}': {source}")]
    InvalidMinimumVersion {
        value: String,
        #[source]
        source: VersionError,
    },
}

/// Options shared by every subcommand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarborConfig {
    /// Tool document location
    pub tools_path: PathBuf,
    /// Oldest accepted document version
    pub minimum_version: SchemaVersion,
    /// Expose read-only tools only
    pub read_only: bool,
}

impl HarborConfig {
    /// Validate raw command-line values
    pub fn new(
        tools_path: PathBuf,
        minimum_version: &str,
        read_only: bool,
    ) -> Result<Self, ConfigError> {
        if tools_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyToolsPath);
        }

        let minimum_version = SchemaVersion::parse(minimum_version).map_err(|source| {
            ConfigError::InvalidMinimumVersion {
                value: minimum_version.to_string(),
                source,
            }
        })?;

        Ok(Self {
            tools_path,
            minimum_version,
            read_only,
        })
    }
}

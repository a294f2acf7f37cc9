//! Configuration schema for csjar
//!
//! Configuration is stored at `~/.config/csjar/config.toml`

use crate::cache::ArtifactStore;
use crate::remote::{DEFAULT_METADATA_URL, DEFAULT_RELEASE_BASE_URL};
use crate::version::LATEST;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which Checkstyle to run and how
    pub checkstyle: CheckstyleConfig,

    /// Jar cache settings
    pub cache: CacheConfig,

    /// Remote endpoints
    pub remote: RemoteConfig,

    /// Java runtime settings
    pub runtime: RuntimeConfig,
}

impl Config {
    /// Effective cache directory
    pub fn cache_dir(&self) -> PathBuf {
        self.cache
            .dir
            .clone()
            .unwrap_or_else(ArtifactStore::default_dir)
    }
}

/// Checkstyle settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckstyleConfig {
    /// Release to use, or "latest"
    pub version: String,

    /// Checkstyle configuration file passed with `-c`
    pub config: String,
}

impl Default for CheckstyleConfig {
    fn default() -> Self {
        Self {
            version: LATEST.to_string(),
            config: "google_checks.xml".to_string(),
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Override for the jar directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

/// Remote endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Maven metadata document used to resolve "latest"
    pub metadata_url: String,

    /// Root of the release downloads
    pub release_base_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            metadata_url: DEFAULT_METADATA_URL.to_string(),
            release_base_url: DEFAULT_RELEASE_BASE_URL.to_string(),
        }
    }
}

/// Java runtime settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Java executable
    pub java: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
        }
    }
}

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://jira.secondlife.com";
pub const DEFAULT_PROJECT: &str = "Sunshine";
pub const DEFAULT_USER: &str = "nyx.linden";
pub const DEFAULT_MAXIMUM_RESULTS: u32 = 50;

/// Options stored on disk. Every field falls back to its default so that a
/// partially written file still loads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default = "default_maximum_results", alias = "maximumresults")]
    pub maximum_results: u32,
    /// Account used for basic auth together with `JIRA_ACTIVITY_TOKEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            project: default_project(),
            user: default_user(),
            maximum_results: default_maximum_results(),
            email: None,
        }
    }
}

impl Config {
    /// Load configuration from the provided path or the default config file.
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Unable to read config file at {}", path.display()))?;

        // An empty file deserializes to unit, not a mapping.
        if raw.trim().is_empty() {
            return Ok(Config::default());
        }

        serde_yaml::from_str(&raw)
            .with_context(|| format!("Malformed YAML in config file {}", path.display()))
    }

    /// Persist the configuration to disk, creating parent directories if needed.
    pub fn save<P: AsRef<Path>>(&self, path: Option<P>) -> Result<PathBuf> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(Config::default_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let serialized = serde_yaml::to_string(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Unable to write config file {}", path.display()))?;

        Ok(path)
    }

    pub fn default_path() -> PathBuf {
        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(".jira-activity");
        path.push("config.yaml");
        path
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_project() -> String {
    DEFAULT_PROJECT.to_string()
}

fn default_user() -> String {
    DEFAULT_USER.to_string()
}

fn default_maximum_results() -> u32 {
    DEFAULT_MAXIMUM_RESULTS
}

//! Configuration loading.
//!
//! Settings come from a YAML file, discovered in priority order:
//! an explicit path (`ORGANIZEME_CONFIG_PATH` or `--config`), then
//! `organizeme.yaml` in the working directory, then
//! `~/.organizeme/config.yaml`. Missing files fall back to defaults;
//! CLI flags override individual fields afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default port for the task API. Matches the original Express server.
pub const DEFAULT_PORT: u16 = 3000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
}

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port for the HTTP API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            db_path: default_db_path(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("organizeme").join("tasks.db"))
        .unwrap_or_else(|| PathBuf::from("organizeme.db"))
}

impl Config {
    /// Load configuration, discovering the config file if no explicit
    /// path is given. A missing file is not an error.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = explicit_path
            .map(PathBuf::from)
            .or_else(|| std::env::var("ORGANIZEME_CONFIG_PATH").ok().map(PathBuf::from))
            .or_else(Self::discover);

        match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                let config: Config = serde_yaml::from_str(&contents)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?;
                debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            _ => {
                debug!("No config file found; using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Look for a config file in the working directory, then the user's
    /// home config directory.
    fn discover() -> Option<PathBuf> {
        let project = PathBuf::from("organizeme.yaml");
        if project.exists() {
            return Some(project);
        }
        dirs::home_dir().map(|h| h.join(".organizeme").join("config.yaml"))
    }

    /// Ensure the database's parent directory exists.
    pub fn ensure_db_dir(&self) -> Result<()> {
        if let Some(parent) = self.server.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create database directory {}", parent.display())
                })?;
            }
        }
        Ok(())
    }
}

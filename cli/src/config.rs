//! Configuration file handling for the CLI.
//!
//! The remembered session token lives in `$XDG_CONFIG_HOME/chaos/config.toml`
//! (platform equivalent elsewhere) and backs the persistent token tier.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use chaos_business::{StorageError, TokenStorage};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Bearer token of a remembered session
    pub token: Option<String>,
}

impl Config {
    /// Default location of the configuration file.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from("com", "chaos", "chaos")
            .context("Failed to determine config directory")?;
        Ok(project_dirs.config_dir().join("config.toml"))
    }

    /// Loads the file at `path`; a missing file is an empty configuration.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| StorageError::Format(e.to_string()))
    }

    /// Writes the file, creating its directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| StorageError::Format(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Persistent token tier backed by the configuration file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    config: Config,
}

impl FileStorage {
    /// Opens the file at `path`. An unreadable file is reported and then
    /// treated as empty, so a corrupt config never blocks signing in again.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = Config::load(&path).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable config {}: {e}", path.display());
            Config::default()
        });
        Self { path, config }
    }
}

impl TokenStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.config.auth.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<(), StorageError> {
        let mut next = self.config.clone();
        next.auth.token = Some(token.to_owned());
        next.save(&self.path)?;
        self.config = next;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        if self.config.auth.token.is_none() {
            return Ok(());
        }
        let mut next = self.config.clone();
        next.auth.token = None;
        next.save(&self.path)?;
        self.config = next;
        Ok(())
    }
}

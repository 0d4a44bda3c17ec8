//! Configuration management
//!
//! This module handles loading quarry configuration from a repository's
//! `.quarry/config.toml` file.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Core configuration section
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CoreConfig {
    /// Alternate hooks directory, absolute or relative to the repository
    /// root. Defaults to `.quarry/hooks` when unset.
    #[serde(default, rename = "hooksPath")]
    pub hooks_path: Option<PathBuf>,
}

/// Advice configuration section
///
/// Controls one-time informational diagnostics about misconfigured setups.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceConfig {
    /// Warn when a hook file exists but is not executable
    #[serde(default = "default_ignored_hook", rename = "ignoredHook")]
    pub ignored_hook: bool,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            ignored_hook: default_ignored_hook(),
        }
    }
}

fn default_ignored_hook() -> bool {
    true
}

/// Top-level quarry configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Core settings
    #[serde(default)]
    pub core: CoreConfig,

    /// Advice toggles
    #[serde(default)]
    pub advice: AdviceConfig,
}

impl Config {
    /// Load configuration for a repository
    ///
    /// Reads `<repo>/.quarry/config.toml` when present, otherwise returns
    /// the defaults. A missing config file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(".quarry/config.toml");
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed as TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    /// Resolve the hooks directory for a repository
    ///
    /// Honors `core.hooksPath` (absolute, or relative to the repository
    /// root), falling back to `<repo>/.quarry/hooks`.
    #[must_use]
    pub fn hooks_dir(&self, repo_root: &Path) -> PathBuf {
        match &self.core.hooks_path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => repo_root.join(path),
            None => repo_root.join(".quarry/hooks"),
        }
    }
}

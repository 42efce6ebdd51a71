//! User configuration.
//!
//! Configuration is stored as TOML:
//! - Linux/macOS: `$XDG_CONFIG_HOME/relsync/config.toml`, falling back to
//!   `~/.config/relsync/config.toml`
//! - Windows: `%APPDATA%/relsync/config.toml`
//!
//! Every field is optional. Command-line flags and environment variables
//! take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// relsync configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub API token.
    pub token: Option<String>,

    /// API base URL, for GitHub Enterprise.
    pub api_url: Option<String>,

    /// Number of assets uploaded at once.
    pub parallel: Option<u32>,

    /// Delete same-named assets before uploading.
    pub replace: bool,
}

impl Config {
    /// Loads the config file from the default location, or defaults if
    /// there is none.
    pub fn load() -> anyhow::Result<Self> {
        match config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from an explicit file, which must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;

        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var_os("APPDATA")?;
        Some(PathBuf::from(appdata).join("relsync").join("config.toml"))
    }

    #[cfg(not(target_os = "windows"))]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("relsync").join("config.toml"))
    }
}

//! docchat configuration
//!
//! Read from `~/.docchat/config.toml`, then overridden by `DOCCHAT_*`
//! environment variables. Command-line flags are applied by the binary.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;

const ENV_BASE_URL: &str = "DOCCHAT_BASE_URL";
const ENV_POLL_INTERVAL_MS: &str = "DOCCHAT_POLL_INTERVAL_MS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the chat backend
    pub base_url: String,
    /// Delay between progress requests
    pub poll_interval_ms: u64,
    /// Stop watching after this many requests
    pub max_polls: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            max_polls: None,
        }
    }
}

impl Config {
    /// `~/.docchat/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".docchat").join("config.toml"))
    }

    /// Load the default config file (if any) with environment overrides applied
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Load a config file; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(interval) = lookup(ENV_POLL_INTERVAL_MS) {
            self.poll_interval_ms = interval
                .trim()
                .parse()
                .with_context(|| format!("{ENV_POLL_INTERVAL_MS} must be a number of milliseconds"))?;
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

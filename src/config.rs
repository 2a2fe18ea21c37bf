//! Feed configuration
//!
//! Read from `$XDG_CONFIG_HOME/poupanca/config.toml` (or the platform config
//! directory); a missing file means defaults. `POUPANCA_CONFIG` points at a
//! different file, and `POUPANCA_PROXY` / `POUPANCA_SERIES_URL` override
//! single keys.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// BCB SGS series 195 (Poupança), JSON format
pub const BCB_SERIES_URL: &str =
    "https://api.bcb.gov.br/dados/serie/bcdata.sgs.195/dados?formato=json";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const CONFIG_FILENAME: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source of the raw series
    pub series_url: String,
    /// Optional proxy, called as `{proxy}?name=poupanca&url={series_url}`
    pub proxy: Option<String>,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            series_url: BCB_SERIES_URL.to_string(),
            proxy: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Invalid poupanca config")
    }

    /// Load from `path`, or from the default location when None
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => default_config_path()?,
        };

        let mut config = if path.exists() {
            debug!("Reading config from {}", path.display());
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_toml_str(&content)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            debug!("No config file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(proxy) = non_empty_env("POUPANCA_PROXY") {
            self.proxy = Some(proxy);
        }
        if let Some(url) = non_empty_env("POUPANCA_SERIES_URL") {
            self.series_url = url;
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}

pub fn default_config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os("POUPANCA_CONFIG") {
        return Ok(PathBuf::from(path));
    }
    let config_dir = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(dir_spec::config_home)
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(config_dir.join("poupanca").join(CONFIG_FILENAME))
}

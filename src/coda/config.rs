//! # Configuration
//!
//! Settings are resolved in this order, later layers winning:
//! 1. **Compiled defaults**: public API base, 30 second timeout, no key.
//! 2. **Environment**: `CODA_API_KEY`, `CODA_API_BASE`.
//! 3. **`config.json`** in the working directory: `CODA_API_KEY`, `api_base`, `timeout_secs`.
//!
//! A file-provided key supersedes the environment one.

use crate::client::http::DEFAULT_API_BASE;
use crate::error::{CodaError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_API_KEY: &str = "CODA_API_KEY";
pub const ENV_API_BASE: &str = "CODA_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodaConfig {
    pub api_key: Option<String>,
    pub api_base: String,
    pub timeout_secs: u64,
}

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(rename = "CODA_API_KEY")]
    api_key: Option<String>,
    api_base: Option<String>,
    timeout_secs: Option<u64>,
}

impl Default for CodaConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CodaConfig {
    /// Load from the process environment and `config_dir/config.json`.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), config_dir.as_ref())
    }

    /// Layer defaults, `env` lookups and the config file.
    pub fn resolve<F>(env: F, config_dir: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(key) = env(ENV_API_KEY).filter(|k| !k.is_empty()) {
            config.api_key = Some(key);
        }
        if let Some(base) = env(ENV_API_BASE).filter(|b| !b.is_empty()) {
            config.api_base = base;
        }

        let path = config_dir.join(CONFIG_FILENAME);
        if path.exists() {
            let content = fs::read_to_string(&path).map_err(CodaError::Io)?;
            let file: ConfigFile = serde_json::from_str(&content)
                .map_err(|e| CodaError::Config(format!("{}: {}", path.display(), e)))?;
            tracing::debug!(path = %path.display(), "applying config file");

            if let Some(key) = file.api_key.filter(|k| !k.is_empty()) {
                config.api_key = Some(key);
            }
            if let Some(base) = file.api_base {
                config.api_base = base;
            }
            if let Some(secs) = file.timeout_secs {
                config.timeout_secs = secs;
            }
        }

        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

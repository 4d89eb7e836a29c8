use crate::core::currency::is_supported;
use anyhow::{Context, Result, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use std::{fs, path::PathBuf};
use tracing::debug;

/// Environment variable that overrides `api_key` from the config file.
pub const API_KEY_ENV: &str = "XRATE_API_KEY";

const SNAPSHOT_FILE: &str = "rates.json";

fn default_base_url() -> String {
    "https://v6.exchangerate-api.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_retries() -> usize {
    1
}

fn default_reference_currency() -> String {
    "USD".to_string()
}

fn default_snapshot_precision() -> usize {
    2
}

fn default_persist() -> bool {
    true
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub retries: usize,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
        }
    }
}

impl ProviderConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    pub api_key: Option<String>,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default = "default_reference_currency")]
    pub reference_currency: String,
    pub data_path: Option<String>,
    pub cache_ttl_secs: Option<u64>,
    #[serde(default = "default_snapshot_precision")]
    pub snapshot_precision: usize,
    /// Keep the snapshot on disk. When false it only lives for the process.
    #[serde(default = "default_persist")]
    pub persist: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "xrate", "xrate")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Location of the persisted rate snapshot.
    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(self.default_data_path()?.join(SNAPSHOT_FILE))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_supported(&self.reference_currency) {
            bail!(
                "Unsupported reference currency: {}",
                self.reference_currency
            );
        }
        if self.snapshot_precision > 12 {
            bail!(
                "snapshot_precision must be at most 12, got {}",
                self.snapshot_precision
            );
        }
        Ok(())
    }

    /// Returns the provider API key, preferring the `XRATE_API_KEY` variable.
    pub fn api_key(&self) -> Result<String> {
        self.api_key_with_override(std::env::var(API_KEY_ENV).ok())
    }

    pub fn api_key_with_override(&self, env_key: Option<String>) -> Result<String> {
        env_key
            .into_iter()
            .chain(self.api_key.clone())
            .map(|key| key.trim().to_string())
            .find(|key| !key.is_empty())
            .with_context(|| {
                format!("No API key configured; set `api_key` in the config file or {API_KEY_ENV}")
            })
    }

    /// How long live rates are reused before a conversion fetches again.
    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

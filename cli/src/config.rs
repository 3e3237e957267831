//! praybit.toml loading
//!
//! Missing file means defaults. Environment variables override the file
//! for the remote endpoint and identity.

use praybit_core::RewardRules;
use praybit_storage::StoreBackend;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const ENV_REMOTE_URL: &str = "PRAYBIT_SUPABASE_URL";
pub const ENV_ANON_KEY: &str = "PRAYBIT_SUPABASE_ANON_KEY";
pub const ENV_USER_ID: &str = "PRAYBIT_USER_ID";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub identity: IdentityConfig,
    pub rewards: RewardRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<String>,
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub debounce_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            debounce_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub user_id: Option<String>,
}

impl Config {
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Load from `path`, or defaults if the file does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Apply overrides from a variable lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_REMOTE_URL) {
            self.remote.url = Some(url);
        }
        if let Some(key) = lookup(ENV_ANON_KEY) {
            self.remote.anon_key = Some(key);
        }
        if let Some(user_id) = lookup(ENV_USER_ID) {
            self.identity.user_id = Some(user_id);
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        match &self.storage.data_dir {
            Some(dir) => PathBuf::from(expand_path(dir)),
            None => default_home(),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.remote.debounce_ms)
    }

    /// Remote URL, treating blanks as unset
    pub fn remote_url(&self) -> Option<&str> {
        self.remote
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
    }
}

pub fn expand_path(path: &str) -> String {
    path.replace("$HOME", &std::env::var("HOME").unwrap_or_default())
}

fn default_home() -> PathBuf {
    PathBuf::from(expand_path("$HOME/.praybit"))
}

pub fn default_config_path() -> PathBuf {
    default_home().join("praybit.toml")
}

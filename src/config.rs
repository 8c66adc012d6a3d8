use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use crate::error::{Result, VerbaError};

// Default values for optional configuration fields
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub remote: RemoteConfig,
    pub cache: CacheConfig,
    pub worker: WorkerConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub bind_addr: String,
    /// Port the HTTP API listens on
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Base URL of the translation resource
    pub base_url: String,
    /// API key for the translation resource; VERBA_API_KEY overrides this
    pub api_key: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached word translations, in seconds
    pub ttl_secs: u64,
    /// Maximum number of cached word translations
    pub max_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Width of the process-wide lookup worker pool, shared across requests
    pub pool_size: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Static code -> name map of supported languages.
    /// When empty, the set is fetched from the translation resource at startup.
    #[serde(default)]
    pub languages: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database recording completed translations
    pub path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_addr: "127.0.0.1".to_string(),
                port: 8080,
            },
            remote: RemoteConfig {
                base_url: "https://translate.yandex.net/api/v1.5/tr.json".to_string(),
                api_key: String::new(),
                timeout_secs: default_timeout_secs(),
            },
            cache: CacheConfig {
                ttl_secs: 3600,
                max_entries: 1000,
            },
            worker: WorkerConfig { pool_size: 10 },
            registry: RegistryConfig::default(),
            database: DatabaseConfig {
                path: "verba.db".to_string(),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VerbaError::Config(format!("Failed to read config file: {}", e)))?;

        Ok(toml::from_str(&content)?)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| VerbaError::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| VerbaError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Pull the remote API credential from the environment when present,
    /// so it never has to live in a config file on disk.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var("VERBA_API_KEY") {
            if !key.is_empty() {
                self.remote.api_key = key;
            }
        }
    }
}

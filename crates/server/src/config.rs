use anyhow::{Context, Result};
use clockbill_core::{JwksConfig, DEFAULT_DOWNLOAD_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENCRYPTION_KEY_ENV: &str = "ENCRYPTION_KEY";
const JWKS_URL_ENV: &str = "CLOCKBILL_JWKS_URL";

/// Clockbill server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token verification
    #[serde(default)]
    pub auth: AuthConfig,

    /// Clockify API client
    #[serde(default)]
    pub clockify: ClockifyConfig,

    /// Installation token storage
    #[serde(default)]
    pub installation: InstallationConfig,

    /// Trial download metering
    #[serde(default)]
    pub trial: TrialConfig,
}

/// HTTP binding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP bind address
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Key set used for tokens carrying a `kid`; such tokens are rejected when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jwks_url: Option<String>,

    /// PEM file replacing the embedded Clockify public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_public_key_path: Option<PathBuf>,

    #[serde(default = "default_jwks_cache_ttl_secs")]
    pub jwks_cache_ttl_secs: u64,

    #[serde(default = "default_jwks_requests_per_minute")]
    pub jwks_requests_per_minute: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockifyConfig {
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct InstallationConfig {
    /// 32 byte AES key, hex encoded
    #[serde(default)]
    pub encryption_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    #[serde(default = "default_download_limit")]
    pub download_limit: i64,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_database_path() -> PathBuf {
    if cfg!(debug_assertions) {
        PathBuf::from("./clockbill.db")
    } else {
        PathBuf::from("/var/lib/clockbill/clockbill.db")
    }
}

fn default_jwks_cache_ttl_secs() -> u64 {
    600
}

fn default_jwks_requests_per_minute() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_download_limit() -> i64 {
    DEFAULT_DOWNLOAD_LIMIT
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwks_url: None,
            static_public_key_path: None,
            jwks_cache_ttl_secs: default_jwks_cache_ttl_secs(),
            jwks_requests_per_minute: default_jwks_requests_per_minute(),
        }
    }
}

impl Default for ClockifyConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            download_limit: default_download_limit(),
        }
    }
}

impl AuthConfig {
    /// Key-set client settings, if a key set is configured
    #[must_use]
    pub fn jwks(&self) -> Option<JwksConfig> {
        let url = self.jwks_url.as_deref().filter(|url| !url.trim().is_empty())?;
        Some(JwksConfig {
            cache_ttl: Duration::from_secs(self.jwks_cache_ttl_secs),
            requests_per_minute: self.jwks_requests_per_minute,
            ..JwksConfig::new(url.trim())
        })
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::info!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Ok(Self::default().with_env_overrides());
        }

        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config.with_env_overrides())
    }

    /// Load from default locations in order:
    /// 1. ./clockbill.toml (current directory)
    /// 2. /etc/clockbill/config.toml (system-wide)
    /// 3. Built-in defaults
    pub fn load_default() -> Result<Self> {
        let paths = vec![
            PathBuf::from("./clockbill.toml"),
            PathBuf::from("/etc/clockbill/config.toml"),
        ];

        for path in paths {
            if path.exists() {
                return Self::load(&path);
            }
        }

        tracing::info!("No config file found, using built-in defaults");
        Ok(Self::default().with_env_overrides())
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(ENCRYPTION_KEY_ENV).ok(),
            std::env::var(JWKS_URL_ENV).ok(),
        )
    }

    fn with_overrides(mut self, encryption_key: Option<String>, jwks_url: Option<String>) -> Self {
        if let Some(key) = encryption_key.filter(|k| !k.trim().is_empty()) {
            self.installation.encryption_key = key;
        }
        if let Some(url) = jwks_url.filter(|u| !u.trim().is_empty()) {
            self.auth.jwks_url = Some(url);
        }
        self
    }

    /// Generate example configuration file
    #[must_use]
    pub fn example() -> String {
        let mut example = Config::default();
        example.auth.jwks_url = Some("https://example.com/.well-known/jwks.json".to_string());
        example.installation.encryption_key = "0".repeat(64);
        toml::to_string_pretty(&example).expect("Failed to serialize example config")
    }
}

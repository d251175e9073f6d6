//! # Configuration Management for storehooks
//!
//! This crate provides centralized configuration structures for all storehooks components:
//! the remote data service connection and the client-side cache.
//!
//! ## Quick Start
//!
//! ### Programmatic Configuration
//! ```rust
//! use config::{CacheConfig, RemoteConfig};
//!
//! let remote = RemoteConfig::new(
//!     "https://project.supabase.co".to_string(),
//!     "anon-key".to_string(),
//! );
//! let cache = CacheConfig::default().with_ttl(60);
//! assert_eq!(cache.default_ttl_seconds, 60);
//! ```
//!
//! ### Environment and TOML
//! The endpoint URL and access key always come from the process environment
//! (`SUPABASE_PROJECT_URL`, `SUPABASE_API_KEY`, a `.env` file is honoured).
//! Non-secret tuning can be placed in a TOML file:
//!
//! ```toml
//! [remote]
//! rest_path = "rest/v1"
//! timeout_seconds = 30
//! returning = "representation"
//!
//! [cache]
//! backend = "memory"
//! default_ttl_seconds = 300
//! key_prefix = "storehooks"
//! invalidate_record_on_mutation = true
//! ```
//!
//! Load configuration:
//! ```rust,no_run
//! use config::AppConfig;
//!
//! // Reads STOREHOOKS_CONFIG or ./storehooks.toml when present
//! let config = AppConfig::load()?;
//! # Ok::<(), config::ConfigError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use thiserror::Error;

const DEFAULT_CONFIG_PATH: &str = "./storehooks.toml";

/// Environment variable holding the remote project base URL
pub const URL_ENV: &str = "SUPABASE_PROJECT_URL";
/// Environment variable holding the remote access credential
pub const API_KEY_ENV: &str = "SUPABASE_API_KEY";
/// Environment variable pointing at an optional TOML tuning file
pub const CONFIG_PATH_ENV: &str = "STOREHOOKS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Missing required environment variable: {0}")]
    MissingEnv(&'static str),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub remote: RemoteConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Remote data service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project base URL (https://xyz.supabase.co)
    pub url: String,

    /// Access credential, sent as `apikey` and bearer token
    pub api_key: String,

    /// Path of the REST endpoint below the base URL
    #[serde(default = "default_rest_path")]
    pub rest_path: String,

    /// Transport timeout; none means the HTTP client default
    #[serde(default)]
    pub timeout_seconds: Option<u64>,

    /// What mutations ask the store to send back
    #[serde(default)]
    pub returning: Returning,
}

/// Mutation return preference, mapped onto the `Prefer: return=...` header
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Returning {
    /// Affected rows are sent back
    #[default]
    Representation,
    /// Nothing is sent back
    Minimal,
}

impl Returning {
    pub fn as_header_value(&self) -> &'static str {
        match self {
            Returning::Representation => "return=representation",
            Returning::Minimal => "return=minimal",
        }
    }
}

/// Cache backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackendKind {
    #[default]
    Memory,
    Redis,
}

/// Cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackendKind,
    /// Redis connection string (redis://localhost:6379), redis backend only
    pub redis_url: Option<String>,
    /// TTL for cache entries (in seconds)
    pub default_ttl_seconds: u64,
    /// Key prefix for all cache entries
    pub key_prefix: String,
    /// Update and Delete also invalidate the single-record key
    pub invalidate_record_on_mutation: bool,
}

/// Tuning file layout: everything except the secrets
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    remote: RemoteTuning,
    #[serde(default)]
    cache: CacheConfig,
}

#[derive(Debug, Default, Deserialize)]
struct RemoteTuning {
    rest_path: Option<String>,
    timeout_seconds: Option<u64>,
    returning: Option<Returning>,
}

fn default_rest_path() -> String {
    "rest/v1".to_string()
}

fn read_env(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnv(name)),
    }
}

impl AppConfig {
    /// Load configuration from the environment plus an optional tuning file
    pub fn load() -> Result<Self, ConfigError> {
        // A missing .env file is fine, the variables may already be exported
        let _ = dotenvy::dotenv();

        let file = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::read_tuning(&config_path)?
        } else if Path::new(DEFAULT_CONFIG_PATH).exists() {
            Self::read_tuning(DEFAULT_CONFIG_PATH)?
        } else {
            FileConfig::default()
        };

        let mut remote = RemoteConfig::from_env()?;
        if let Some(rest_path) = file.remote.rest_path {
            remote.rest_path = rest_path;
        }
        remote.timeout_seconds = file.remote.timeout_seconds.or(remote.timeout_seconds);
        if let Some(returning) = file.remote.returning {
            remote.returning = returning;
        }

        let config = Self {
            remote,
            cache: file.cache,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load a complete configuration (secrets included) from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn read_tuning<P: AsRef<Path>>(path: P) -> Result<FileConfig, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Remote validations
        if !(self.remote.url.starts_with("http://") || self.remote.url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "Remote url must start with http:// or https://, got '{}'",
                self.remote.url
            )));
        }
        if self.remote.api_key.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "Remote api_key cannot be empty".to_string(),
            ));
        }
        if self.remote.rest_path.trim_matches('/').is_empty() {
            return Err(ConfigError::Invalid(
                "Remote rest_path cannot be empty".to_string(),
            ));
        }
        if self.remote.timeout_seconds == Some(0) {
            return Err(ConfigError::Invalid(
                "Remote timeout_seconds must be greater than 0".to_string(),
            ));
        }

        // Cache validations
        if self.cache.default_ttl_seconds == 0 {
            return Err(ConfigError::Invalid(
                "Cache default_ttl_seconds must be greater than 0".to_string(),
            ));
        }
        if self.cache.key_prefix.is_empty() {
            return Err(ConfigError::Invalid(
                "Cache key_prefix cannot be empty".to_string(),
            ));
        }
        if self.cache.backend == CacheBackendKind::Redis
            && self.cache.redis_url.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::Invalid(
                "Redis cache backend requires redis_url".to_string(),
            ));
        }

        Ok(())
    }
}

impl RemoteConfig {
    /// Create a new remote configuration with default tuning
    pub fn new(url: String, api_key: String) -> Self {
        Self {
            url,
            api_key,
            rest_path: default_rest_path(),
            timeout_seconds: None,
            returning: Returning::default(),
        }
    }

    /// Read the endpoint URL and credential from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = read_env(URL_ENV)?;
        let api_key = read_env(API_KEY_ENV)?;
        Ok(Self::new(url, api_key))
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn with_returning(mut self, returning: Returning) -> Self {
        self.returning = returning;
        self
    }

    /// Base URL of the REST endpoint, without trailing slash
    pub fn rest_url(&self) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            self.rest_path.trim_matches('/')
        )
    }
}

impl CacheConfig {
    /// Create a new in-memory cache configuration
    pub fn new(default_ttl_seconds: u64, key_prefix: String) -> Self {
        Self {
            default_ttl_seconds,
            key_prefix,
            ..Self::default()
        }
    }

    /// Use a shared redis cache instead of the in-process one
    pub fn redis(redis_url: String, default_ttl_seconds: u64, key_prefix: String) -> Self {
        Self {
            backend: CacheBackendKind::Redis,
            redis_url: Some(redis_url),
            default_ttl_seconds,
            key_prefix,
            invalidate_record_on_mutation: true,
        }
    }

    pub fn with_ttl(mut self, seconds: u64) -> Self {
        self.default_ttl_seconds = seconds;
        self
    }

    pub fn with_record_invalidation(mut self, enabled: bool) -> Self {
        self.invalidate_record_on_mutation = enabled;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            redis_url: None,
            default_ttl_seconds: 300,
            key_prefix: "storehooks".to_string(),
            invalidate_record_on_mutation: true,
        }
    }
}

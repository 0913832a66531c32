//! Configuration system for mindgate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use strum::{Display, EnumString};

use crate::error::{MindgateError, MindgateResult};

/// Default intention lifetime: 8 hours.
pub const DEFAULT_INTENTION_TTL_SECS: u64 = 8 * 60 * 60;

/// Default period between background sweeps: 1 hour.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60 * 60;

/// Sites blocked when no signed-in user (or no reachable backend) is available.
pub const DEFAULT_FALLBACK_DOMAINS: &[&str] = &[
    "https://instagram.com",
    "https://www.instagram.com",
    "https://youtube.com",
    "https://www.youtube.com",
    "https://linkedin.com",
    "https://www.linkedin.com",
    "https://facebook.com",
    "https://www.facebook.com",
    "https://twitter.com",
    "https://www.twitter.com",
    "https://x.com",
    "https://www.x.com",
    "https://tiktok.com",
    "https://www.tiktok.com",
];

/// Intention store and sweep settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentionConfig {
    /// Lifetime of every intention, in seconds.
    pub ttl_secs: u64,
    /// Period of the background sweep, in seconds.
    pub sweep_interval_secs: u64,
    /// Whether to sweep once when the runtime starts.
    pub sweep_on_start: bool,
    /// Page opened on first install.
    pub welcome_url: String,
}

impl Default for IntentionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_INTENTION_TTL_SECS,
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            sweep_on_start: true,
            welcome_url: "src/popup/index.html#/welcome".to_string(),
        }
    }
}

impl IntentionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Sweep period, never shorter than one second.
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Key-value backend type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Memory,
    #[default]
    Sqlite,
}

/// Local storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// SQLite database file (ignored for the memory backend).
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            path: mindgate_dir().join("storage.db"),
        }
    }
}

/// Remote blocked-sites backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Public (anon) API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anon_key: Option<String>,
    /// Access token of the signed-in user's session, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Table holding `(user_id, url)` rows.
    pub table: String,
    /// Returned when no user is signed in or the backend fails.
    pub fallback_domains: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: None,
            anon_key: None,
            access_token: None,
            table: "blocked_sites".to_string(),
            fallback_domains: DEFAULT_FALLBACK_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Host process settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

/// Main configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MindgateConfig {
    pub intentions: IntentionConfig,
    pub storage: StorageConfig,
    pub backend: BackendConfig,
    pub server: ServerConfig,
}

fn mindgate_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".mindgate"))
        .unwrap_or_else(|| PathBuf::from(".mindgate"))
}

impl MindgateConfig {
    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<std::path::Path>) -> MindgateResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| MindgateError::Configuration(e.to_string()))
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| MindgateError::Configuration(e.to_string())),
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| MindgateError::Configuration(e.to_string())),
            _ => Err(MindgateError::Configuration(
                "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
            )),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads:
    /// - `MINDGATE_INTENTION_TTL_SECS`
    /// - `MINDGATE_SWEEP_INTERVAL_SECS`
    /// - `MINDGATE_SKIP_STARTUP_SWEEP` (any value disables the startup sweep)
    /// - `MINDGATE_STORAGE_BACKEND` (`memory` or `sqlite`)
    /// - `MINDGATE_STORAGE_PATH`
    /// - `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `SUPABASE_ACCESS_TOKEN`
    /// - `MINDGATE_BLOCKED_SITES_TABLE`
    /// - `MINDGATE_HOST`, `MINDGATE_PORT`
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Override fields of `self` from environment variables (see [`from_env`](Self::from_env)).
    pub fn merge_env(mut self) -> Self {
        if let Some(ttl) = env_parse("MINDGATE_INTENTION_TTL_SECS") {
            self.intentions.ttl_secs = ttl;
        }
        if let Some(interval) = env_parse("MINDGATE_SWEEP_INTERVAL_SECS") {
            self.intentions.sweep_interval_secs = interval;
        }
        if std::env::var("MINDGATE_SKIP_STARTUP_SWEEP").is_ok() {
            self.intentions.sweep_on_start = false;
        }

        if let Some(backend) = env_parse("MINDGATE_STORAGE_BACKEND") {
            self.storage.backend = backend;
        }
        if let Ok(path) = std::env::var("MINDGATE_STORAGE_PATH") {
            self.storage.path = PathBuf::from(path);
        }

        if let Ok(url) = std::env::var("SUPABASE_URL") {
            self.backend.url = Some(url);
        }
        if let Ok(key) = std::env::var("SUPABASE_ANON_KEY") {
            self.backend.anon_key = Some(key);
        }
        if let Ok(token) = std::env::var("SUPABASE_ACCESS_TOKEN") {
            self.backend.access_token = Some(token);
        }
        if let Ok(table) = std::env::var("MINDGATE_BLOCKED_SITES_TABLE") {
            self.backend.table = table;
        }

        if let Ok(host) = std::env::var("MINDGATE_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse("MINDGATE_PORT") {
            self.server.port = port;
        }

        self
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> MindgateConfigBuilder {
        MindgateConfigBuilder::default()
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!(var = name, value = %raw, "Ignoring unparseable environment variable");
            None
        }
    }
}

/// Builder for MindgateConfig.
#[derive(Default)]
pub struct MindgateConfigBuilder {
    config: MindgateConfig,
}

impl MindgateConfigBuilder {
    /// Set the intention lifetime.
    pub fn intention_ttl(mut self, ttl: Duration) -> Self {
        self.config.intentions.ttl_secs = ttl.as_secs();
        self
    }

    /// Set the background sweep period.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.intentions.sweep_interval_secs = interval.as_secs();
        self
    }

    /// Skip the sweep normally run when the runtime starts.
    pub fn without_startup_sweep(mut self) -> Self {
        self.config.intentions.sweep_on_start = false;
        self
    }

    /// Keep everything in memory.
    pub fn in_memory_storage(mut self) -> Self {
        self.config.storage.backend = StorageBackend::Memory;
        self
    }

    /// Use a SQLite file at `path`.
    pub fn sqlite_storage(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.storage.backend = StorageBackend::Sqlite;
        self.config.storage.path = path.into();
        self
    }

    /// Set the remote backend URL and anon key.
    pub fn backend(mut self, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.config.backend.url = Some(url.into());
        self.config.backend.anon_key = Some(anon_key.into());
        self
    }

    /// Set the signed-in user's access token.
    pub fn access_token(mut self, token: impl Into<String>) -> Self {
        self.config.backend.access_token = Some(token.into());
        self
    }

    /// Replace the fallback block list.
    pub fn fallback_domains(mut self, domains: Vec<String>) -> Self {
        self.config.backend.fallback_domains = domains;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> MindgateConfig {
        self.config
    }
}

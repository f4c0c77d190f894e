use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BIND: &str = "127.0.0.1";
pub const MAX_LIVE_CLIENTS: usize = 100; // hard cap on open SSE streams
pub const KEEPALIVE_INTERVAL_SECS: u64 = 30; // `:ping` sweep cadence
pub const CLIENT_BUFFER_FRAMES: usize = 64; // per-client queue before a client counts as dead

/// Top-level config (liga.toml + LIGA_* env overrides).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LigaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub leaders: LeadersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_bind")]
    pub bind: String,
    /// When set, every POST/PUT/DELETE route requires `Authorization: Bearer <token>`.
    pub admin_token: Option<String>,
    /// Directory served for any path no API route matches (the scorekeeper UI).
    pub static_dir: Option<String>,
    /// Allow any origin. Off by default; the UI is normally served same-origin.
    #[serde(default)]
    pub cors_permissive: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            admin_token: None,
            static_dir: None,
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Live-update stream settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveConfig {
    #[serde(default = "default_max_clients")]
    pub max_clients: usize,
    #[serde(default = "default_keepalive_secs")]
    pub keepalive_secs: u64,
    /// Frames queued per client. A client that falls this far behind is dropped.
    #[serde(default = "default_client_buffer")]
    pub client_buffer: usize,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            max_clients: MAX_LIVE_CLIENTS,
            keepalive_secs: KEEPALIVE_INTERVAL_SECS,
            client_buffer: CLIENT_BUFFER_FRAMES,
        }
    }
}

/// Qualification thresholds and page sizes for leaderboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadersConfig {
    #[serde(default = "default_min_at_bats")]
    pub min_at_bats: i64,
    #[serde(default = "default_min_innings")]
    pub min_innings: f64,
    #[serde(default = "default_min_chances")]
    pub min_chances: i64,
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for LeadersConfig {
    fn default() -> Self {
        Self {
            min_at_bats: default_min_at_bats(),
            min_innings: default_min_innings(),
            min_chances: default_min_chances(),
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}
fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}
fn default_max_clients() -> usize {
    MAX_LIVE_CLIENTS
}
fn default_keepalive_secs() -> u64 {
    KEEPALIVE_INTERVAL_SECS
}
fn default_client_buffer() -> usize {
    CLIENT_BUFFER_FRAMES
}
fn default_min_at_bats() -> i64 {
    10
}
fn default_min_innings() -> f64 {
    5.0
}
fn default_min_chances() -> i64 {
    5
}
fn default_limit() -> usize {
    10
}
fn default_max_limit() -> usize {
    100
}
fn default_db_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.liga/liga.db", home)
}

impl LigaConfig {
    /// Load config from a TOML file with LIGA_* env var overrides.
    ///
    /// Nested keys use a double underscore: `LIGA_LIVE__MAX_CLIENTS=50`.
    /// A missing file is not an error; every field has a default.
    pub fn load(config_path: Option<&str>) -> crate::error::Result<Self> {
        let path = config_path
            .map(String::from)
            .unwrap_or_else(default_config_path);
        tracing::debug!(path = %path, "loading config");

        let config: LigaConfig = Figment::new()
            .merge(Toml::file(&path))
            .merge(Env::prefixed("LIGA_").split("__"))
            .extract()
            .map_err(|e| crate::error::LigaError::Config(e.to_string()))?;

        Ok(config)
    }
}

fn default_config_path() -> String {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    format!("{}/.liga/liga.toml", home)
}

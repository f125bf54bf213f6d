use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SeekError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u32(key: &str, default: u32) -> u32 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub words: WordsConfig,
    pub update: UpdateConfig,
    pub search: SearchConfig,
    pub gateway: GatewayConfig,
    pub postgres: PostgresConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            words: WordsConfig::from_env(),
            update: UpdateConfig::from_env(),
            search: SearchConfig::from_env(),
            gateway: GatewayConfig::from_env(),
            postgres: PostgresConfig::from_env(),
        }
    }

    /// Read config from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, SeekError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| SeekError::Internal(format!("cannot read {}: {e}", path.display())))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| SeekError::Internal(format!("cannot parse {}: {e}", path.display())))
    }

    /// YAML file when a path is given, environment otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, SeekError> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Ok(Self::from_env()),
        }
    }
}

// ── Per-service sections ──────────────────────────────────────

/// Normalizer service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordsConfig {
    /// Bind address for the words HTTP server.
    pub address: String,
}

impl WordsConfig {
    fn from_env() -> Self {
        Self {
            address: env_or("WORDS_ADDRESS", "0.0.0.0:8081"),
        }
    }
}

/// Ingestion service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Bind address for the update HTTP server.
    pub address: String,
    /// Base URL of the words service.
    pub words_url: String,
    /// Base URL of the remote comic catalog.
    pub xkcd_url: String,
    /// Worker pool size for one ingestion pass. Must be >= 1.
    pub concurrency: usize,
    /// Per-request timeout for catalog fetches, in seconds.
    pub fetch_timeout_secs: u64,
}

impl UpdateConfig {
    fn from_env() -> Self {
        Self {
            address: env_or("UPDATE_ADDRESS", "0.0.0.0:8082"),
            words_url: env_or("WORDS_URL", "http://localhost:8081"),
            xkcd_url: env_or("XKCD_URL", "https://xkcd.com"),
            concurrency: env_usize("UPDATE_CONCURRENCY", 10),
            fetch_timeout_secs: env_u64("FETCH_TIMEOUT", 10),
        }
    }
}

/// Search service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Bind address for the search HTTP server.
    pub address: String,
    /// Base URL of the words service.
    pub words_url: String,
    /// Seconds between in-memory index rebuilds.
    pub index_rebuild_secs: u64,
}

impl SearchConfig {
    fn from_env() -> Self {
        Self {
            address: env_or("SEARCH_ADDRESS", "0.0.0.0:8083"),
            words_url: env_or("WORDS_URL", "http://localhost:8081"),
            index_rebuild_secs: env_u64("INDEX_REBUILD_INTERVAL", 300),
        }
    }
}

/// Public gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Bind address for the public HTTP server.
    pub address: String,
    /// Base URLs of the downstream services.
    pub words_url: String,
    pub search_url: String,
    pub update_url: String,
    /// Lifetime of a minted admin token, in seconds.
    pub token_ttl_secs: u64,
    /// Requests per second allowed on each search endpoint.
    pub search_rps: u32,
    /// Admin credentials. Login is refused when unset.
    pub admin_user: Option<String>,
    pub admin_password: Option<String>,
    /// HS256 signing secret for admin tokens.
    pub token_secret: String,
}

impl GatewayConfig {
    fn from_env() -> Self {
        Self {
            address: env_or("GATEWAY_ADDRESS", "0.0.0.0:8080"),
            words_url: env_or("WORDS_URL", "http://localhost:8081"),
            search_url: env_or("SEARCH_URL", "http://localhost:8083"),
            update_url: env_or("UPDATE_URL", "http://localhost:8082"),
            token_ttl_secs: env_u64("TOKEN_TTL", 3600),
            search_rps: env_u32("SEARCH_RPS", 10),
            admin_user: env_opt("ADMIN_USER"),
            admin_password: env_opt("ADMIN_PASSWORD"),
            token_secret: env_or("TOKEN_SECRET", ""),
        }
    }
}

/// Shared Postgres connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Full connection URL. Services refuse to start without it.
    pub url: Option<String>,
}

impl PostgresConfig {
    fn from_env() -> Self {
        Self {
            url: env_opt("PG_URL"),
        }
    }

    pub fn database_url(&self) -> Result<&str, SeekError> {
        self.url
            .as_deref()
            .ok_or_else(|| SeekError::Internal("PG_URL is not set".into()))
    }
}

//! Service configuration loaded from the environment.

use std::path::PathBuf;
use std::time::Duration;

use lifegrid_store::CacheTtls;
use serde::{Deserialize, Serialize};

/// Application-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Port the HTTP/WebSocket server binds to.
    pub port: u16,

    /// Directory where board records are persisted.
    pub data_dir: PathBuf,

    /// TTL in seconds for `board:{id}:current` cache entries.
    pub cache_ttl_current: u64,

    /// TTL in seconds for `board:{id}:generation:{G}` cache entries.
    pub cache_ttl_generation: u64,

    /// TTL in seconds for the reserved final-state cache key.
    pub cache_ttl_final: u64,

    /// Log filter, e.g. `info` or `lifegrid_api=debug`.
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            data_dir: PathBuf::from(".lifegrid"),
            cache_ttl_current: 3600,
            cache_ttl_generation: 86_400,
            cache_ttl_final: 604_800,
            log_level: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment.
    pub fn load() -> Self {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();

        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            config.port = port.parse().unwrap_or(config.port);
        }
        if let Ok(data_dir) = std::env::var("LIFEGRID_DATA_DIR") {
            config.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(ttl) = std::env::var("CACHE_TTL_CURRENT") {
            config.cache_ttl_current = ttl.parse().unwrap_or(config.cache_ttl_current);
        }
        if let Ok(ttl) = std::env::var("CACHE_TTL_GENERATION") {
            config.cache_ttl_generation = ttl.parse().unwrap_or(config.cache_ttl_generation);
        }
        if let Ok(ttl) = std::env::var("CACHE_TTL_FINAL") {
            config.cache_ttl_final = ttl.parse().unwrap_or(config.cache_ttl_final);
        }
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.log_level = Some(level);
        }

        config
    }

    /// The cache TTLs as the repository expects them.
    pub fn cache_ttls(&self) -> CacheTtls {
        CacheTtls {
            current: Duration::from_secs(self.cache_ttl_current),
            generation: Duration::from_secs(self.cache_ttl_generation),
            final_state: Duration::from_secs(self.cache_ttl_final),
        }
    }
}

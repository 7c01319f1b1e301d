//! Configuration Module
//!
//! Server configuration loaded from environment variables with defaults.

use std::env;
use std::str::FromStr;

// == Defaults ==
const DEFAULT_MAX_ENTRIES: usize = 1000;
const DEFAULT_TTL_SECONDS: u64 = 300;
const DEFAULT_SERVER_PORT: u16 = 3000;
const DEFAULT_CLEANUP_INTERVAL: u64 = 1;

/// Server configuration parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
}

/// Reads an environment variable, falling back to `default` when the
/// variable is unset or unparsable.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Loads the configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self {
            max_entries: env_or("MAX_ENTRIES", DEFAULT_MAX_ENTRIES),
            default_ttl: env_or("DEFAULT_TTL", DEFAULT_TTL_SECONDS),
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            cleanup_interval: env_or("CLEANUP_INTERVAL", DEFAULT_CLEANUP_INTERVAL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
            default_ttl: DEFAULT_TTL_SECONDS,
            server_port: DEFAULT_SERVER_PORT,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
        }
    }
}

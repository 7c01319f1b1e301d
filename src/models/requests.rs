//! Request DTOs for the cache server API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::cache::MAX_KEY_LENGTH;

/// Request body for the SET operation (PUT /set)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// The value to store
    pub value: String,
    /// Optional TTL in seconds
    #[serde(default)]
    pub ttl: Option<u64>,
}

impl SetRequest {
    /// Validates the request data.
    pub fn validate(&self) -> Result<(), String> {
        if self.key.is_empty() {
            return Err("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Err(format!(
                "Key exceeds maximum length of {} characters",
                MAX_KEY_LENGTH
            ));
        }
        Ok(())
    }
}

/// Request body for the atomic increment operation (POST /incr/:key)
///
/// The increment runs as one entry-processor invocation: the stored value
/// is read, parsed as an integer, adjusted by `delta` and written back.
#[derive(Debug, Clone, Deserialize)]
pub struct IncrRequest {
    /// Amount to add to the stored counter (may be negative)
    #[serde(default = "default_delta")]
    pub delta: i64,
}

fn default_delta() -> i64 {
    1
}

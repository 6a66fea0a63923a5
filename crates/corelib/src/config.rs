//! Node configuration.
//!
//! Built once at startup and handed to the request handler by value. Every
//! node in a ring must agree on `replication_factor` and `id_bits`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_REPLICATION_FACTOR: u32 = 3;
pub const DEFAULT_MAX_LOOKUP_HOPS: u32 = 64;
pub const DEFAULT_ID_BITS: u32 = 128;

/// Static configuration of one node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Length of the successor list and number of replication hops per write.
    pub replication_factor: u32,
    /// Budget of delegations a single `find_successor` may use.
    pub max_lookup_hops: u32,
    /// Width of the identifier space.
    pub id_bits: u32,
    pub retry: RetryConfig,
}

/// Retry behaviour of outbound calls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub attempts: u32,
    /// Delay before the second attempt; grows linearly afterwards.
    pub backoff_ms: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            replication_factor: DEFAULT_REPLICATION_FACTOR,
            max_lookup_hops: DEFAULT_MAX_LOOKUP_HOPS,
            id_bits: DEFAULT_ID_BITS,
            retry: RetryConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: 3,
            backoff_ms: 50,
        }
    }
}

impl NodeConfig {
    /// Parse and validate a JSON document; absent fields take defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: NodeConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_replication_factor(mut self, factor: u32) -> Self {
        self.replication_factor = factor;
        self
    }

    pub fn with_id_bits(mut self, bits: u32) -> Self {
        self.id_bits = bits;
        self
    }

    pub fn with_max_lookup_hops(mut self, hops: u32) -> Self {
        self.max_lookup_hops = hops;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replication_factor < 1 {
            return Err(ConfigError::OutOfRange {
                field: "replication_factor",
                expected: "at least 1",
                value: self.replication_factor.into(),
            });
        }
        if self.max_lookup_hops < 1 {
            return Err(ConfigError::OutOfRange {
                field: "max_lookup_hops",
                expected: "at least 1",
                value: self.max_lookup_hops.into(),
            });
        }
        if !(1..=128).contains(&self.id_bits) {
            return Err(ConfigError::OutOfRange {
                field: "id_bits",
                expected: "between 1 and 128",
                value: self.id_bits.into(),
            });
        }
        if self.retry.attempts < 1 {
            return Err(ConfigError::OutOfRange {
                field: "retry.attempts",
                expected: "at least 1",
                value: self.retry.attempts.into(),
            });
        }
        Ok(())
    }
}

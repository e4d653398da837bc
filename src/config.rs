//! Configuration for grouplink
//!
//! Centralized configuration with sensible defaults.

use std::time::Duration;

use crate::error::{LinkError, Result};

/// Default TTL for cached group metadata (12 hours)
pub const DEFAULT_METADATA_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// Default cost charged per cached metadata entry
pub const DEFAULT_ENTRY_WEIGHT: u64 = 256;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,grouplink=debug";

/// Main configuration for a grouplink client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Remote service address (host:port)
    pub server_addr: String,

    /// Connect timeout (milliseconds)
    pub connect_timeout_ms: u64,

    /// Maximum wait for any single response (milliseconds).
    /// Applied uniformly to every resolver wait.
    pub msg_timeout_ms: u64,

    // -------------------------------------------------------------------------
    // Cache Configuration
    // -------------------------------------------------------------------------
    /// How long a metadata lookup stays valid in the cache
    pub metadata_ttl: Duration,

    /// Weight charged for one cached metadata entry
    pub cache_entry_weight: u64,

    /// Total weight the cache may hold before evicting
    pub cache_max_weight: u64,

    /// Staged writes before the cache commits without an explicit wait
    pub cache_buffer_size: usize,

    /// Join concurrent misses for the same key onto one round trip
    pub dedupe_in_flight: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:7400".to_string(),
            connect_timeout_ms: 5000,
            msg_timeout_ms: 20_000,
            metadata_ttl: DEFAULT_METADATA_TTL,
            cache_entry_weight: DEFAULT_ENTRY_WEIGHT,
            cache_max_weight: 1 << 20, // 4096 entries at default weight
            cache_buffer_size: 64,
            dedupe_in_flight: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolver wait as a Duration
    pub fn msg_timeout(&self) -> Duration {
        Duration::from_millis(self.msg_timeout_ms)
    }

    /// Connect timeout as a Duration
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Reject settings that would make every request fail or never cache
    pub fn validate(&self) -> Result<()> {
        if self.msg_timeout_ms == 0 {
            return Err(LinkError::Config("msg_timeout_ms must be > 0".to_string()));
        }
        if self.connect_timeout_ms == 0 {
            return Err(LinkError::Config(
                "connect_timeout_ms must be > 0".to_string(),
            ));
        }
        if self.metadata_ttl.is_zero() {
            return Err(LinkError::Config("metadata_ttl must be > 0".to_string()));
        }
        if self.cache_entry_weight == 0 {
            return Err(LinkError::Config(
                "cache_entry_weight must be > 0".to_string(),
            ));
        }
        if self.cache_max_weight < self.cache_entry_weight {
            return Err(LinkError::Config(format!(
                "cache_max_weight ({}) cannot hold a single entry of weight {}",
                self.cache_max_weight, self.cache_entry_weight
            )));
        }
        if self.cache_buffer_size == 0 {
            return Err(LinkError::Config(
                "cache_buffer_size must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the remote service address
    pub fn server_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.server_addr = addr.into();
        self
    }

    /// Set the connect timeout (in milliseconds)
    pub fn connect_timeout_ms(mut self, ms: u64) -> Self {
        self.config.connect_timeout_ms = ms;
        self
    }

    /// Set the response timeout (in milliseconds)
    pub fn msg_timeout_ms(mut self, ms: u64) -> Self {
        self.config.msg_timeout_ms = ms;
        self
    }

    /// Set the metadata cache TTL
    pub fn metadata_ttl(mut self, ttl: Duration) -> Self {
        self.config.metadata_ttl = ttl;
        self
    }

    /// Set the weight charged per cached entry
    pub fn cache_entry_weight(mut self, weight: u64) -> Self {
        self.config.cache_entry_weight = weight;
        self
    }

    /// Set the total cache capacity (in weight units)
    pub fn cache_max_weight(mut self, weight: u64) -> Self {
        self.config.cache_max_weight = weight;
        self
    }

    /// Set how many writes may be staged before an implicit commit
    pub fn cache_buffer_size(mut self, size: usize) -> Self {
        self.config.cache_buffer_size = size;
        self
    }

    /// Enable joining concurrent cache misses for the same key
    pub fn dedupe_in_flight(mut self, enabled: bool) -> Self {
        self.config.dedupe_in_flight = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

//! Query Module
//!
//! Read-through path for idempotent lookups.
//!
//! ## Flow
//! ```text
//! query(fp) ──► cache.get(fp) ── hit ──► value
//!                    │
//!                   miss
//!                    ▼
//!               loader() ── err ──► error (cache untouched)
//!                    │
//!                    ok
//!                    ▼
//!     cache.set_with_ttl(fp) + cache.wait() ──► value
//! ```

mod flight;

use std::time::Duration;

pub use flight::FlightGroup;

use crate::cache::ReadThroughCache;
use crate::config::Config;
use crate::error::Result;
use crate::fingerprint::RequestFingerprint;

/// Cacheable lookup wrapper
pub struct CachedQuery<V> {
    ttl: Duration,
    weight: u64,
    /// Present when concurrent misses for one key share a round trip
    flights: Option<FlightGroup<V>>,
}

impl<V: Clone + Send + Sync> CachedQuery<V> {
    pub fn new(ttl: Duration, weight: u64) -> Self {
        Self {
            ttl,
            weight,
            flights: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let query = Self::new(config.metadata_ttl, config.cache_entry_weight);
        if config.dedupe_in_flight {
            query.with_in_flight_dedupe()
        } else {
            query
        }
    }

    /// Join concurrent misses for the same fingerprint onto one round trip
    pub fn with_in_flight_dedupe(mut self) -> Self {
        self.flights = Some(FlightGroup::new());
        self
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Serve from `cache` if possible, otherwise run `loader` and cache its result.
    ///
    /// With no cache every call runs `loader`. Failed loads are returned
    /// unchanged and never written.
    pub fn query<F>(
        &self,
        fingerprint: &RequestFingerprint,
        cache: Option<&dyn ReadThroughCache<V>>,
        loader: F,
    ) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let Some(cache) = cache else {
            return loader();
        };

        let key = fingerprint.as_str();
        if let Some(value) = cache.get(key) {
            tracing::trace!("Cache hit for {}", key);
            return Ok(value);
        }

        tracing::trace!("Cache miss for {}", key);

        match &self.flights {
            Some(flights) => flights.run(key, || {
                // A previous leader may have filled the cache since our miss
                if let Some(value) = cache.get(key) {
                    return Ok(value);
                }
                self.load_and_store(key, cache, loader)
            }),
            None => self.load_and_store(key, cache, loader),
        }
    }

    fn load_and_store<F>(&self, key: &str, cache: &dyn ReadThroughCache<V>, loader: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let value = loader()?;

        if !cache.set_with_ttl(key, value.clone(), self.weight, self.ttl) {
            tracing::debug!("Cache refused entry for {}", key);
        }
        cache.wait();

        Ok(value)
    }
}

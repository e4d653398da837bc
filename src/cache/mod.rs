//! Cache Module
//!
//! Read-through cache for idempotent lookups.
//!
//! ## Responsibilities
//! - Map a request fingerprint to a previously decoded result
//! - Expire entries after a per-entry TTL
//! - Bound memory by total entry weight
//! - Make staged writes visible only after an explicit `wait()`
//!
//! ## Write Path
//! ```text
//! set_with_ttl ──► staged buffer ──(wait / buffer full)──► committed map
//!                                                            ▲
//! get ───────────────────────────────────────────────────────┘
//! ```

mod clock;
mod ttl_cache;

use std::time::Duration;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ttl_cache::TtlCache;

/// Storage contract the read-through path relies on
pub trait ReadThroughCache<V>: Send + Sync {
    /// Look up a committed, unexpired value
    fn get(&self, key: &str) -> Option<V>;

    /// Stage a write. Returns false if the cache refuses the value.
    fn set_with_ttl(&self, key: &str, value: V, weight: u64, ttl: Duration) -> bool;

    /// Block until every earlier `set_with_ttl` is visible to `get`
    fn wait(&self);

    /// Drop a key, staged or committed
    fn remove(&self, key: &str);
}

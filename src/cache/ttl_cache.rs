//! TTL cache implementation
//!
//! HashMap-based cache with weight accounting and staged writes.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock};

use super::{Clock, ReadThroughCache, SystemClock};
use crate::config::Config;

/// A committed entry
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    weight: u64,
    expires_at: Instant,
    /// Insertion sequence number, used for oldest-first eviction
    seq: u64,
}

/// A write waiting for the next commit
#[derive(Debug)]
struct StagedWrite<V> {
    key: String,
    value: V,
    weight: u64,
    expires_at: Instant,
}

/// Committed state, always mutated as a whole under the write lock
#[derive(Debug)]
struct Committed<V> {
    entries: HashMap<String, CacheEntry<V>>,
    /// seq -> key, oldest first
    order: BTreeMap<u64, String>,
    total_weight: u64,
    next_seq: u64,
}

impl<V> Committed<V> {
    fn remove(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.seq);
        self.total_weight -= entry.weight;
        Some(entry)
    }
}

/// Weight-bounded cache with per-entry TTL
///
/// ## Concurrency:
/// - `committed`: RwLock (many concurrent readers, exclusive commit)
/// - `staged`: Mutex, held across a commit so `wait()` is a real barrier
///   (lock order: staged → committed)
pub struct TtlCache<V> {
    committed: RwLock<Committed<V>>,
    staged: Mutex<Vec<StagedWrite<V>>>,
    max_weight: u64,
    buffer_size: usize,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> TtlCache<V> {
    /// Create a cache holding at most `max_weight` units
    pub fn new(max_weight: u64, buffer_size: usize) -> Self {
        Self::with_clock(max_weight, buffer_size, Arc::new(SystemClock))
    }

    /// Create a cache sized from config
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.cache_max_weight, config.cache_buffer_size)
    }

    /// Create a cache with a custom time source
    pub fn with_clock(max_weight: u64, buffer_size: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            committed: RwLock::new(Committed {
                entries: HashMap::new(),
                order: BTreeMap::new(),
                total_weight: 0,
                next_seq: 0,
            }),
            staged: Mutex::new(Vec::new()),
            max_weight,
            buffer_size: buffer_size.max(1),
            clock,
        }
    }

    /// Number of committed entries (expired ones included until evicted)
    pub fn len(&self) -> usize {
        self.committed.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weight currently held by committed entries
    pub fn total_weight(&self) -> u64 {
        self.committed.read().total_weight
    }

    pub fn max_weight(&self) -> u64 {
        self.max_weight
    }

    /// Number of writes waiting for a commit
    pub fn staged_count(&self) -> usize {
        self.staged.lock().len()
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut committed = self.committed.write();
        Self::purge_expired_locked(&mut committed, now)
    }

    /// Drop everything, staged and committed
    pub fn clear(&self) {
        let mut staged = self.staged.lock();
        staged.clear();
        let mut committed = self.committed.write();
        committed.entries.clear();
        committed.order.clear();
        committed.total_weight = 0;
    }

    fn purge_expired_locked(committed: &mut Committed<V>, now: Instant) -> usize {
        let expired: Vec<String> = committed
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at <= now)
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired {
            committed.remove(key);
        }
        expired.len()
    }

    /// Apply staged writes. Caller holds the staged lock.
    fn commit_locked(&self, staged: &mut Vec<StagedWrite<V>>) {
        if staged.is_empty() {
            return;
        }

        let now = self.clock.now();
        let mut committed = self.committed.write();

        for write in staged.drain(..) {
            // Replace, never merge
            committed.remove(&write.key);

            if committed.total_weight + write.weight > self.max_weight {
                let purged = Self::purge_expired_locked(&mut committed, now);
                if purged > 0 {
                    tracing::trace!("Purged {} expired cache entries", purged);
                }
            }

            while committed.total_weight + write.weight > self.max_weight {
                let oldest = committed.order.iter().next().map(|(_, k)| k.clone());
                match oldest {
                    Some(key) => {
                        tracing::trace!("Evicting cache entry {}", key);
                        committed.remove(&key);
                    }
                    None => break,
                }
            }

            let seq = committed.next_seq;
            committed.next_seq += 1;
            committed.order.insert(seq, write.key.clone());
            committed.total_weight += write.weight;
            committed.entries.insert(
                write.key,
                CacheEntry {
                    value: write.value,
                    weight: write.weight,
                    expires_at: write.expires_at,
                    seq,
                },
            );
        }
    }
}

impl<V: Clone + Send + Sync> ReadThroughCache<V> for TtlCache<V> {
    fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let committed = self.committed.read();
        committed
            .entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.value.clone())
    }

    fn set_with_ttl(&self, key: &str, value: V, weight: u64, ttl: Duration) -> bool {
        if weight > self.max_weight {
            tracing::debug!(
                "Refusing cache entry {}: weight {} exceeds capacity {}",
                key,
                weight,
                self.max_weight
            );
            return false;
        }

        let expires_at = self.clock.now() + ttl;
        let mut staged = self.staged.lock();
        staged.push(StagedWrite {
            key: key.to_string(),
            value,
            weight,
            expires_at,
        });

        if staged.len() >= self.buffer_size {
            self.commit_locked(&mut staged);
        }
        true
    }

    fn wait(&self) {
        let mut staged = self.staged.lock();
        self.commit_locked(&mut staged);
    }

    fn remove(&self, key: &str) {
        let mut staged = self.staged.lock();
        staged.retain(|write| write.key != key);
        self.committed.write().remove(key);
    }
}

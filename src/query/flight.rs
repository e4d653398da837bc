//! In-flight request joining
//!
//! Lets concurrent callers for the same key share one round trip.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::error::Result;

/// One round trip that other callers may wait on
struct Flight<V> {
    /// `None` while running; `Some(None)` if the leader failed
    outcome: Mutex<Option<Option<V>>>,
    done: Condvar,
}

impl<V: Clone> Flight<V> {
    fn new() -> Self {
        Self {
            outcome: Mutex::new(None),
            done: Condvar::new(),
        }
    }

    fn wait(&self) -> Option<V> {
        let mut outcome = self.outcome.lock();
        while outcome.is_none() {
            self.done.wait(&mut outcome);
        }
        (*outcome).clone().flatten()
    }
}

/// Tracks the round trips currently running, keyed by fingerprint
pub struct FlightGroup<V> {
    flights: Mutex<HashMap<String, Arc<Flight<V>>>>,
}

impl<V: Clone> FlightGroup<V> {
    pub fn new() -> Self {
        Self {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Number of keys with a round trip in progress
    pub fn in_flight(&self) -> usize {
        self.flights.lock().len()
    }

    /// Run `work` for `key`, or wait for the caller already running it.
    ///
    /// Followers share the leader's value on success. If the leader fails,
    /// each follower runs `work` itself and sees its own error.
    pub fn run<F>(&self, key: &str, work: F) -> Result<V>
    where
        F: FnOnce() -> Result<V>,
    {
        let (flight, is_leader) = {
            let mut flights = self.flights.lock();
            match flights.get(key) {
                Some(flight) => (Arc::clone(flight), false),
                None => {
                    let flight = Arc::new(Flight::new());
                    flights.insert(key.to_string(), Arc::clone(&flight));
                    (flight, true)
                }
            }
        };

        if !is_leader {
            tracing::trace!("Joining in-flight request for {}", key);
            return match flight.wait() {
                Some(value) => Ok(value),
                None => work(),
            };
        }

        let mut guard = LeaderGuard {
            group: self,
            key,
            flight: &*flight,
            value: None,
        };
        let result = work();
        if let Ok(value) = &result {
            guard.value = Some(value.clone());
        }
        drop(guard);
        result
    }
}

impl<V: Clone> Default for FlightGroup<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes the leader's outcome even if `work` panics
struct LeaderGuard<'a, V> {
    group: &'a FlightGroup<V>,
    key: &'a str,
    flight: &'a Flight<V>,
    value: Option<V>,
}

impl<V> Drop for LeaderGuard<'_, V> {
    fn drop(&mut self) {
        self.group.flights.lock().remove(self.key);
        *self.flight.outcome.lock() = Some(self.value.take());
        self.flight.done.notify_all();
    }
}

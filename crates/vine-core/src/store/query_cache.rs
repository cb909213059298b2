//! In-memory result cache for relay queries.
//!
//! Entries are whole query results keyed by the query's inputs. An entry is
//! fresh for `fresh_for` after it was stored, stale until `evict_after`, and
//! gone afterwards. Entries are only ever replaced, never mutated in place.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use parking_lot::RwLock;
use tokio::time::Instant;

use crate::config::QueryTiming;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<V> {
    Fresh(V),
    Stale(V),
    Missing,
}

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

pub struct QueryCache<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
    fresh_for: Duration,
    evict_after: Duration,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new(fresh_for: Duration, evict_after: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            fresh_for,
            // A window shorter than freshness would evict fresh entries
            evict_after: evict_after.max(fresh_for),
        }
    }

    pub fn from_timing(timing: &QueryTiming) -> Self {
        Self::new(timing.fresh_for(), timing.evict_after())
    }

    pub fn get(&self, key: &K) -> Lookup<V> {
        let age = {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return Lookup::Missing,
                Some(entry) => {
                    let age = entry.stored_at.elapsed();
                    if age < self.fresh_for {
                        return Lookup::Fresh(entry.value.clone());
                    }
                    if age < self.evict_after {
                        return Lookup::Stale(entry.value.clone());
                    }
                    age
                }
            }
        };

        tracing::trace!("Evicting cache entry aged {:?}", age);
        self.remove_if_expired(key);
        Lookup::Missing
    }

    /// Remove `key` only if it is still past the eviction window under the
    /// write lock. An insert that landed after the read keeps its entry.
    fn remove_if_expired(&self, key: &K) -> bool {
        let mut entries = self.entries.write();
        let expired = entries
            .get(key)
            .is_some_and(|entry| entry.stored_at.elapsed() >= self.evict_after);
        if expired {
            entries.remove(key);
        }
        expired
    }

    pub fn insert(&self, key: K, value: V) {
        self.entries.write().insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn invalidate(&self, key: &K) -> bool {
        self.entries.write().remove(key).is_some()
    }

    /// Drop every entry past the eviction window. Returns how many were dropped.
    pub fn sweep(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.stored_at.elapsed() < self.evict_after);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

//! Keyed Cache Module
//!
//! Main cache engine combining HashMap storage with LRU tracking and TTL
//! expiration, generic over the cached value type.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};
use crate::clock::{Clock, SystemClock};

// == Cache Options ==
/// Tuning knobs for one cache instance.
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// TTL applied when `set` is called without an explicit TTL
    pub default_ttl: Duration,
    /// Serve an expired entry one final time before dropping it
    pub allow_stale: bool,
    /// Refresh LRU recency on reads
    pub refresh_on_get: bool,
    /// Per-entry cap on serialized size in bytes; zero disables the cap
    pub max_value_bytes: usize,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: Duration::from_secs(300),
            allow_stale: false,
            refresh_on_get: true,
            max_value_bytes: 256 * 1024,
        }
    }
}

// == Keyed Cache ==
/// In-memory cache with LRU eviction and TTL expiry, typed per value kind.
///
/// Every operation is best-effort: nothing here returns an error to the
/// caller. An oversized or unserializable value is dropped with a debug log,
/// a read of a missing key is just a miss.
#[derive(Debug)]
pub struct KeyedCache<T> {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry<T>>,
    /// LRU access tracker
    lru: LruTracker<CacheKey>,
    /// Performance statistics
    stats: CacheStats,
    /// Tuning knobs
    options: CacheOptions,
    /// Time source for TTL decisions
    clock: Arc<dyn Clock>,
}

impl<T: Clone + Serialize> KeyedCache<T> {
    // == Constructors ==
    /// Creates a cache reading the system clock.
    pub fn new(options: CacheOptions) -> Self {
        Self::with_clock(options, Arc::new(SystemClock))
    }

    /// Creates a cache with an injected clock.
    pub fn with_clock(options: CacheOptions, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            options,
            clock,
        }
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A live entry counts as a hit and refreshes recency. An expired entry is
    /// removed; with `allow_stale` it is still returned this one time (counted
    /// as a hit) so the next read misses and triggers a refresh. Anything else
    /// is a miss.
    pub fn get(&mut self, key: &CacheKey) -> Option<T> {
        let now = self.clock.now_ms();

        match self.entries.get_mut(key) {
            None => {
                self.stats.record_miss();
                return None;
            }
            Some(entry) if !entry.is_expired(now) => {
                entry.touch(now);
                let value = entry.value.clone();
                self.stats.record_hit();
                if self.options.refresh_on_get {
                    self.lru.touch(key);
                }
                return Some(value);
            }
            Some(_) => {}
        }

        // Expired: drop the entry either way
        let removed = self.entries.remove(key);
        self.lru.remove(key);
        self.stats.set_size(self.entries.len());

        if self.options.allow_stale {
            self.stats.record_hit();
            return removed.map(|entry| entry.value);
        }

        self.stats.record_miss();
        None
    }

    // == Set ==
    /// Stores a key-value pair with optional TTL.
    ///
    /// If the key already exists, the value is overwritten and TTL is reset.
    /// If the cache is at capacity, the least recently used entry is evicted.
    /// A value whose serialized form exceeds the configured size cap is
    /// silently dropped; the cache is left unchanged.
    pub fn set(&mut self, key: CacheKey, value: T, ttl: Option<Duration>) {
        if self.options.max_value_bytes > 0 {
            match serde_json::to_vec(&value) {
                Ok(bytes) if bytes.len() > self.options.max_value_bytes => {
                    debug!(key = %key, size = bytes.len(), "value exceeds size cap, not cached");
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(key = %key, %err, "value not serializable, not cached");
                    return;
                }
            }
        }

        // If not overwriting and at capacity, evict oldest entry
        let is_overwrite = self.entries.contains_key(&key);
        if !is_overwrite && self.options.max_entries > 0 && self.entries.len() >= self.options.max_entries {
            if let Some(evicted_key) = self.lru.evict_oldest() {
                self.entries.remove(&evicted_key);
                self.stats.record_eviction();
            }
        }

        let now = self.clock.now_ms();
        let effective_ttl = ttl.unwrap_or(self.options.default_ttl);
        let entry = CacheEntry::new(value, now, effective_ttl);
        self.entries.insert(key.clone(), entry);

        // Update LRU tracker (touch moves to front)
        self.lru.touch(&key);
        self.stats.set_size(self.entries.len());
    }

    // == Delete ==
    /// Removes a single entry. Returns whether anything was removed; a missing
    /// key is not an error.
    pub fn delete(&mut self, key: &CacheKey) -> bool {
        if self.entries.remove(key).is_some() {
            self.lru.remove(key);
            self.stats.set_size(self.entries.len());
            true
        } else {
            false
        }
    }

    // == Invalidate Prefix ==
    /// Removes every entry whose key falls under the given prefix.
    ///
    /// O(n) scan of current keys. Returns the number of entries removed.
    pub fn invalidate_prefix(&mut self, prefix: &CacheKey) -> usize {
        let doomed: Vec<CacheKey> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_size(self.entries.len());
        doomed.len()
    }

    // == Purge Where ==
    /// Removes every entry whose key and value match the predicate.
    ///
    /// Used for invalidations that are not key-addressable, like dropping all
    /// auth tokens belonging to one user. Returns the number removed.
    pub fn purge_where(&mut self, mut pred: impl FnMut(&CacheKey, &T) -> bool) -> usize {
        let doomed: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(key, entry)| pred(key, &entry.value))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_size(self.entries.len());
        doomed.len()
    }

    // == Clear ==
    /// Empties the cache.
    ///
    /// Hit/miss/eviction counters persist across `clear()`; they reset only
    /// via [`KeyedCache::reset_stats`].
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru = LruTracker::new();
        self.stats.set_size(0);
    }

    // == Prune Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn prune_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let expired_keys: Vec<CacheKey> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();

        for key in expired_keys {
            self.entries.remove(&key);
            self.lru.remove(&key);
        }

        self.stats.set_size(self.entries.len());
        count
    }

    // == Stats ==
    /// Returns a snapshot of the current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.size = self.entries.len();
        stats.max = self.options.max_entries;
        stats
    }

    // == Reset Stats ==
    /// Zeroes the hit/miss/eviction counters. Entries are untouched.
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

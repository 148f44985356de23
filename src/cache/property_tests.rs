//! Property-Based Tests for Cache Module
//!
//! Uses proptest to verify correctness properties of the keyed cache.

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{CacheKey, CacheOptions, KeyedCache};
use crate::clock::ManualClock;

// == Test Configuration ==
const TEST_MAX_ENTRIES: usize = 100;

fn test_cache(max_entries: usize) -> (KeyedCache<String>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(0));
    let options = CacheOptions {
        max_entries,
        default_ttl: Duration::from_secs(300),
        ..CacheOptions::default()
    };
    (KeyedCache::with_clock(options, clock.clone()), clock)
}

fn key(id: &str) -> CacheKey {
    CacheKey::new("test").segment(id)
}

// == Strategies ==
/// Generates valid key identifier segments
fn segment_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,32}".prop_map(|s| s)
}

/// Generates cache values
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ]{1,128}".prop_map(|s| s)
}

/// Generates a sequence of cache operations for testing
#[derive(Debug, Clone)]
enum CacheOp {
    Set { id: String, value: String },
    Get { id: String },
    Delete { id: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (segment_strategy(), value_strategy()).prop_map(|(id, value)| CacheOp::Set { id, value }),
        segment_strategy().prop_map(|id| CacheOp::Get { id }),
        segment_strategy().prop_map(|id| CacheOp::Delete { id }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations, hits + misses equals the number of get
    // calls and each counter reflects the operations that actually occurred.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let (mut store, _) = test_cache(TEST_MAX_ENTRIES);
        let mut expected_hits: u64 = 0;
        let mut expected_misses: u64 = 0;
        let mut gets: u64 = 0;

        for op in ops {
            match op {
                CacheOp::Set { id, value } => {
                    store.set(key(&id), value, None);
                }
                CacheOp::Get { id } => {
                    gets += 1;
                    match store.get(&key(&id)) {
                        Some(_) => expected_hits += 1,
                        None => expected_misses += 1,
                    }
                }
                CacheOp::Delete { id } => {
                    store.delete(&key(&id));
                }
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits, "Hits mismatch");
        prop_assert_eq!(stats.misses, expected_misses, "Misses mismatch");
        prop_assert_eq!(stats.hits + stats.misses, gets, "Counters must cover every get");
        prop_assert_eq!(stats.size, store.len(), "Size mismatch");
    }

    // For any valid key-value pair, storing then retrieving it before
    // expiration returns the exact value that was stored.
    #[test]
    fn prop_roundtrip_storage(id in segment_strategy(), value in value_strategy()) {
        let (mut store, _) = test_cache(TEST_MAX_ENTRIES);

        store.set(key(&id), value.clone(), None);

        let retrieved = store.get(&key(&id));
        prop_assert_eq!(retrieved, Some(value), "Round-trip value mismatch");
    }

    // For any key that exists in the cache, after a delete a subsequent get
    // returns nothing.
    #[test]
    fn prop_delete_removes_entry(id in segment_strategy(), value in value_strategy()) {
        let (mut store, _) = test_cache(TEST_MAX_ENTRIES);

        store.set(key(&id), value, None);
        prop_assert!(store.get(&key(&id)).is_some(), "Key should exist before delete");

        store.delete(&key(&id));

        prop_assert!(store.get(&key(&id)).is_none(), "Key should not exist after delete");
    }

    // For any key, storing V1 then V2 results in get returning V2 and exactly
    // one entry being counted.
    #[test]
    fn prop_overwrite_semantics(
        id in segment_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let (mut store, _) = test_cache(TEST_MAX_ENTRIES);

        store.set(key(&id), value1, None);
        store.set(key(&id), value2.clone(), None);

        let retrieved = store.get(&key(&id));
        prop_assert_eq!(retrieved, Some(value2), "Overwrite should return new value");
        prop_assert_eq!(store.len(), 1, "Should have exactly one entry after overwrite");
    }

    // For any sequence of set operations, the entry count never exceeds the
    // configured capacity.
    #[test]
    fn prop_capacity_enforcement(
        entries in prop::collection::vec(
            (segment_strategy(), value_strategy()),
            1..200
        )
    ) {
        let max_entries = 50; // Use smaller max for testing
        let (mut store, _) = test_cache(max_entries);

        for (id, value) in entries {
            store.set(key(&id), value, None);
            prop_assert!(
                store.len() <= max_entries,
                "Cache size {} exceeds max {}",
                store.len(),
                max_entries
            );
        }
    }

    // For any entry stored with a TTL, a get issued after the TTL has elapsed
    // on the injected clock returns nothing, and a get just before it hits.
    #[test]
    fn prop_ttl_expiration_behavior(
        id in segment_strategy(),
        value in value_strategy(),
        ttl_ms in 1u64..10_000
    ) {
        let (mut store, clock) = test_cache(TEST_MAX_ENTRIES);

        store.set(key(&id), value.clone(), Some(Duration::from_millis(ttl_ms)));

        clock.set_ms(ttl_ms - 1);
        let before = store.get(&key(&id));
        prop_assert_eq!(before, Some(value), "Entry should be live before TTL elapses");

        clock.set_ms(ttl_ms);
        let after = store.get(&key(&id));
        prop_assert!(after.is_none(), "Entry should be gone once TTL elapses");
    }

    // Invalidating one kind's prefix removes exactly that kind's entries.
    #[test]
    fn prop_prefix_invalidation_is_kind_scoped(
        product_ids in prop::collection::hash_set(segment_strategy(), 1..10),
        category_ids in prop::collection::hash_set(segment_strategy(), 1..10)
    ) {
        let (mut store, _) = test_cache(TEST_MAX_ENTRIES);

        for id in &product_ids {
            store.set(CacheKey::new("product").segment(id), id.clone(), None);
        }
        for id in &category_ids {
            store.set(CacheKey::new("category").segment(id), id.clone(), None);
        }

        let removed = store.invalidate_prefix(&CacheKey::new("product"));

        prop_assert_eq!(removed, product_ids.len(), "Every product entry should be removed");
        prop_assert_eq!(store.len(), category_ids.len(), "Category entries should survive");
        for id in &category_ids {
            prop_assert!(store.get(&CacheKey::new("category").segment(id)).is_some());
        }
    }
}

// Property tests for LRU eviction behavior
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any sequence of operations that fills the cache to capacity, adding
    // a new entry evicts the least recently used key, not an arbitrary one.
    #[test]
    fn prop_lru_eviction_order(
        initial_ids in prop::collection::vec(segment_strategy(), 3..10),
        new_id in segment_strategy(),
        new_value in value_strategy()
    ) {
        // Deduplicate ids to ensure we have unique entries
        let unique_ids: Vec<String> = initial_ids
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_ids.len() >= 2);
        prop_assume!(!unique_ids.contains(&new_id));

        let capacity = unique_ids.len();
        let (mut store, _) = test_cache(capacity);

        // Fill cache to capacity - first key added will be oldest (LRU candidate)
        let oldest_id = unique_ids[0].clone();
        for id in &unique_ids {
            store.set(key(id), format!("value_{}", id), None);
        }

        prop_assert_eq!(store.len(), capacity, "Cache should be at capacity");

        // Add new entry - should evict the oldest (first) key
        store.set(key(&new_id), new_value, None);

        prop_assert_eq!(store.len(), capacity, "Cache should remain at capacity after eviction");
        prop_assert!(
            store.get(&key(&oldest_id)).is_none(),
            "Oldest key '{}' should have been evicted",
            oldest_id
        );
        prop_assert!(
            store.get(&key(&new_id)).is_some(),
            "New key '{}' should exist after insertion",
            new_id
        );

        // All other original keys (except oldest) should still exist
        for id in unique_ids.iter().skip(1) {
            prop_assert!(
                store.get(&key(id)).is_some(),
                "Key '{}' should still exist (not the oldest)",
                id
            );
        }
    }

    // For any get on an existing key, that key becomes the most recently used
    // and is not the next eviction candidate.
    #[test]
    fn prop_lru_access_tracking(
        ids in prop::collection::vec(segment_strategy(), 3..8),
        new_id in segment_strategy(),
        new_value in value_strategy()
    ) {
        // Deduplicate ids
        let unique_ids: Vec<String> = ids
            .into_iter()
            .collect::<std::collections::HashSet<_>>()
            .into_iter()
            .collect();

        prop_assume!(unique_ids.len() >= 3);
        prop_assume!(!unique_ids.contains(&new_id));

        let capacity = unique_ids.len();
        let (mut store, _) = test_cache(capacity);

        for id in &unique_ids {
            store.set(key(id), format!("value_{}", id), None);
        }

        // Access the first key (which would normally be evicted next) via get.
        // This should move it to most recently used.
        let accessed_id = unique_ids[0].clone();
        store.get(&key(&accessed_id));

        // Now the second key should be the oldest (LRU candidate)
        let expected_evicted = unique_ids[1].clone();

        // Add new entry to trigger eviction
        store.set(key(&new_id), new_value, None);

        prop_assert!(
            store.get(&key(&accessed_id)).is_some(),
            "Accessed key '{}' should not be evicted after being touched",
            accessed_id
        );
        prop_assert!(
            store.get(&key(&expected_evicted)).is_none(),
            "Key '{}' should have been evicted as it was oldest after access",
            expected_evicted
        );
        prop_assert!(
            store.get(&key(&new_id)).is_some(),
            "New key should exist"
        );
    }
}

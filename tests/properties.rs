//! Property-based tests for the keyed collections.
//!
//! These tests check the ordering, balance and chaining invariants of the containers, and that
//! every container honours the dictionary contract, using proptest.

use std::collections::{BTreeMap, HashSet};

use copse::{
    BalancedMap, BuildIdentityHasher, Dictionary, Error, HashTable, Natural, OrderedMap, Sequence,
};
use proptest::prelude::*;

// =============================================================================
// Strategies for Generating Test Data
// =============================================================================

/// Strategy for generating a list of distinct keys, in no particular order.
fn distinct_keys(max_size: usize) -> impl Strategy<Value = Vec<i32>> {
    prop::collection::hash_set(any::<i32>(), 0..max_size)
        .prop_map(|keys| keys.into_iter().collect::<Vec<i32>>())
        .prop_shuffle()
}

/// Strategy for generating a list of insertions (true) and deletions (false) over a small key
/// range, so that deletions often hit.
fn operations(max_size: usize) -> impl Strategy<Value = Vec<(bool, u8)>> {
    prop::collection::vec((any::<bool>(), 0u8..64), 0..max_size)
}

fn keys_of<C, B>(map: &copse::BinaryTree<i32, i32, C, B>) -> Vec<i32> {
    map.iter().map(|(k, _)| *k).collect()
}

// =============================================================================
// Ordering Laws
// =============================================================================

proptest! {
    /// Law: an in-order walk yields keys in strictly increasing order.
    #[test]
    fn prop_in_order_is_sorted(keys in prop::collection::vec(any::<i32>(), 0..200)) {
        let mut ordered = OrderedMap::new();
        let mut balanced = BalancedMap::new();
        for key in &keys {
            // Repeated keys are rejected, which is fine here
            let _ = ordered.insert(*key, *key);
            let _ = balanced.insert(*key, *key);
        }

        let expected: Vec<i32> = keys
            .iter()
            .copied()
            .collect::<std::collections::BTreeSet<i32>>()
            .into_iter()
            .collect();

        prop_assert_eq!(keys_of(&ordered), expected.clone());
        prop_assert_eq!(keys_of(&balanced), expected);
    }

    /// Law: a reversed comparator yields keys in strictly decreasing order.
    #[test]
    fn prop_in_order_follows_comparator(keys in distinct_keys(100)) {
        let mut map = OrderedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for key in &keys {
            map.insert(*key, *key).unwrap();
        }

        let walked = keys_of(&map);
        prop_assert!(walked.windows(2).all(|pair| pair[0] > pair[1]));
    }
}

// =============================================================================
// Balance Laws
// =============================================================================

proptest! {
    /// Law: a balanced map stays within one level of balance after every call, and holds the
    /// same keys as a reference map.
    #[test]
    fn prop_balance_holds_after_every_call(ops in operations(300)) {
        let mut map = BalancedMap::new();
        let mut model = BTreeMap::new();

        for (insert, key) in ops {
            if insert {
                let expected = if model.contains_key(&key) {
                    Err(Error::DuplicateKey)
                } else {
                    model.insert(key, ());
                    Ok(model.len())
                };
                prop_assert_eq!(map.insert(key, ()), expected);
            } else {
                let expected = model.remove(&key).ok_or(Error::NotFound);
                prop_assert_eq!(map.delete(&key), expected);
            }

            prop_assert!(map.is_height_balanced());
            prop_assert_eq!(map.len(), model.len());
        }

        let keys: Vec<u8> = map.iter().map(|(k, _)| *k).collect();
        let expected: Vec<u8> = model.keys().copied().collect();
        prop_assert_eq!(keys, expected);
    }

    /// Law: a balanced map of n keys is no taller than 1.44 log2(n + 2).
    #[test]
    fn prop_balanced_height_is_logarithmic(keys in distinct_keys(500)) {
        let mut map = BalancedMap::new();
        for key in &keys {
            map.insert(*key, ()).unwrap();
        }

        let bound = 1.4405 * ((keys.len() + 2) as f64).log2();
        prop_assert!((map.height() as f64) < bound);
    }
}

// =============================================================================
// Dictionary Laws
// =============================================================================

/// Insert every key, search for every key, then delete every key.
fn round_trip<D: Dictionary<i32, i64>>(index: &mut D, keys: &[i32]) -> Result<(), TestCaseError> {
    for (n, key) in keys.iter().enumerate() {
        prop_assert_eq!(index.insert(*key, *key as i64 * 7), Ok(n + 1));
    }
    for key in keys {
        let lookup = index.search(key);
        prop_assert!(lookup.is_ok());
        if let Ok(lookup) = lookup {
            prop_assert_eq!(**lookup, *key as i64 * 7);
            prop_assert!(lookup.comparisons() >= 1);
        }
    }
    for key in keys {
        prop_assert_eq!(index.delete(key), Ok(*key as i64 * 7));
    }
    prop_assert_eq!(index.len(), 0);
    prop_assert!(index.is_empty());
    Ok(())
}

/// Insert every key, then try each one again.
fn rejects_duplicates<D: Dictionary<i32, i64>>(
    index: &mut D,
    keys: &[i32],
) -> Result<(), TestCaseError> {
    for key in keys {
        index.insert(*key, 0).unwrap();
    }
    let text = index.to_text();

    for key in keys {
        prop_assert_eq!(index.insert(*key, 1), Err(Error::DuplicateKey));
    }
    prop_assert_eq!(index.len(), keys.len());
    prop_assert_eq!(index.to_text(), text);
    Ok(())
}

proptest! {
    /// Law: inserted values are found again, and deleting them all empties the container.
    #[test]
    fn prop_round_trip(keys in distinct_keys(200)) {
        round_trip(&mut OrderedMap::new(), &keys)?;
        round_trip(&mut BalancedMap::new(), &keys)?;
        round_trip(&mut HashTable::sized_for(keys.len()).unwrap(), &keys)?;
    }

    /// Law: inserting a present key fails and changes nothing.
    #[test]
    fn prop_duplicates_are_rejected(keys in distinct_keys(100)) {
        rejects_duplicates(&mut OrderedMap::new(), &keys)?;
        rejects_duplicates(&mut BalancedMap::new(), &keys)?;
        rejects_duplicates(
            &mut HashTable::with_capacity_and_hasher(7, BuildIdentityHasher).unwrap(),
            &keys,
        )?;
    }

    /// Law: a miss reports the same comparisons as walking the whole search path.
    #[test]
    fn prop_miss_counts_path(keys in distinct_keys(100), missing: i32) {
        prop_assume!(!keys.contains(&missing));

        let mut map = OrderedMap::new();
        for key in &keys {
            map.insert(*key, ()).unwrap();
        }

        let probe = map.probe(&missing);
        prop_assert!(probe.value.is_none());
        prop_assert!(probe.stats.comparisons <= (map.height() + 1) as u64);
        prop_assert_eq!(map.search(&missing).unwrap_err(), Error::NotFound);
    }
}

// =============================================================================
// Re-indexing Laws
// =============================================================================

proptest! {
    /// Law: re-keying by an injective key keeps the size and the set of values.
    #[test]
    fn prop_rekey_preserves_values(keys in distinct_keys(200)) {
        let mut by_id = OrderedMap::new();
        for key in &keys {
            by_id.insert(*key, *key as i64 * 3).unwrap();
        }

        let by_value: OrderedMap<i64, i64> =
            OrderedMap::rekey(&by_id, |value| -*value, Natural).unwrap();
        prop_assert_eq!(by_value.len(), by_id.len());

        let mut before: Vec<i64> = by_id.iter().map(|(_, v)| *v).collect();
        let mut after: Vec<i64> = by_value.iter().map(|(_, v)| *v).collect();
        // Negated keys walk the values in reverse
        after.reverse();
        prop_assert_eq!(&before, &after);

        before.sort_unstable();
        after.sort_unstable();
        prop_assert_eq!(before, after);
    }

    /// Law: re-keying by a key that is not injective fails.
    #[test]
    fn prop_rekey_rejects_collisions(keys in distinct_keys(50)) {
        prop_assume!(keys.len() >= 2);

        let mut by_id = OrderedMap::new();
        for key in &keys {
            by_id.insert(*key, *key).unwrap();
        }

        let collapsed: Result<BalancedMap<i32, i32>, Error> =
            BalancedMap::rekey(&by_id, |_| 0, Natural);
        prop_assert_eq!(collapsed.err(), Some(Error::DuplicateKey));
    }
}

// =============================================================================
// Hash Chaining Laws
// =============================================================================

proptest! {
    /// Law: keys that collide are chained, with every key kept once.
    #[test]
    fn prop_colliding_keys_chain(capacity in 1usize..16, offset in 0usize..16) {
        let offset = offset % capacity;
        let mut table = HashTable::with_capacity_and_hasher(capacity, BuildIdentityHasher).unwrap();

        let count = capacity * 3;
        for n in 0..count {
            let key = (n * capacity + offset) as u64;
            prop_assert_eq!(table.insert(key, n), Ok(offset));
        }

        let total: usize = table.buckets().iter().map(Sequence::len).sum();
        prop_assert_eq!(total, count);
        prop_assert_eq!(table.buckets()[offset].len(), count);

        for bucket in table.buckets() {
            let distinct: HashSet<u64> = bucket.iter().map(|entry| *entry.key()).collect();
            prop_assert_eq!(distinct.len(), bucket.len());
        }
    }

    /// Law: spreading keys over the buckets loses none of them.
    #[test]
    fn prop_bucket_sizes_sum_to_len(keys in distinct_keys(200), capacity in 1usize..32) {
        let mut table = HashTable::with_capacity(capacity).unwrap();
        for key in &keys {
            let index = table.insert(*key, ()).unwrap();
            prop_assert_eq!(index, table.hash_index(key));
        }

        let total: usize = table.buckets().iter().map(Sequence::len).sum();
        prop_assert_eq!(total, keys.len());
        prop_assert_eq!(table.len(), keys.len());
    }
}

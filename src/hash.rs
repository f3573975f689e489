//! Hash tables that resolve collisions by separate chaining
//!
//! A `HashTable` has a fixed number of buckets chosen when it is built. Each bucket is a
//! `Sequence` of entries, and a key always lives in bucket `hash(key) % capacity`. The table never
//! grows: keep the load factor in check by sizing it up front, for example with `sized_for`.

use core::{
    fmt::{Debug, Display},
    hash::{BuildHasher, Hash, Hasher},
};
use std::collections::hash_map::RandomState;

use tracing::debug;

use crate::{
    error::{Error, Result},
    sequence::Sequence,
    stats::{Lookup, Meter, Probe},
};

//-----------------------------------------------------------------------------------------------//

/// A key/value pair stored in a `HashTable` bucket.
///
/// Equality with a key, and hashing, are delegated to the entry's key.
#[derive(Clone, Debug)]
pub struct Entry<K, V> {
    key: K,
    value: V,
}

impl<K, V> Entry<K, V> {
    /// Constructor
    pub fn new(key: K, value: V) -> Entry<K, V> {
        Entry { key, value }
    }

    /// The entry's key
    #[inline]
    pub fn key(&self) -> &K {
        &self.key
    }

    /// The entry's value
    #[inline]
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Take the entry's value
    #[inline]
    pub fn into_value(self) -> V {
        self.value
    }
}

impl<K: PartialEq, V> PartialEq<K> for Entry<K, V> {
    #[inline]
    fn eq(&self, key: &K) -> bool {
        self.key == *key
    }
}

impl<K: Hash, V> Hash for Entry<K, V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<K: Display, V: Display> Display for Entry<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} => {}", self.key, self.value)
    }
}

//-----------------------------------------------------------------------------------------------//

/// How to pick a table's capacity from the number of entries it is expected to hold
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableSizing {
    /// Target ratio of entries to buckets
    pub load_factor: f64,
}

impl Default for TableSizing {
    fn default() -> Self {
        // One bucket for every 0.8 entries, i.e. 1.25 buckets per entry
        TableSizing { load_factor: 0.8 }
    }
}

impl TableSizing {
    /// Get the smallest prime capacity that keeps `expected_len` entries within the load factor.
    ///
    /// Fails with `Error::InvalidArgument` unless the load factor is positive and finite.
    pub fn capacity_for(&self, expected_len: usize) -> Result<usize> {
        if !(self.load_factor.is_finite() && self.load_factor > 0.0) {
            return Err(Error::InvalidArgument("load factor must be positive"));
        }

        let minimum = (expected_len as f64 / self.load_factor).ceil() as usize;
        Ok(next_prime(minimum.max(2)))
    }
}

// Smallest prime no less than `n`
fn next_prime(mut n: usize) -> usize {
    while !is_prime(n) {
        n += 1;
    }
    n
}

fn is_prime(n: usize) -> bool {
    if n < 4 {
        return n >= 2;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

//-----------------------------------------------------------------------------------------------//

/// A hasher that uses an integer key as its own hash code.
///
/// Signed integers hash to their absolute value. This makes bucket placement predictable, which
/// suits keys that are already well spread, such as record ids. Keys that write more than one
/// word, like strings and tuples, fold every word in as `hash * 31 + word`.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityHasher(u64);

impl IdentityHasher {
    #[inline]
    fn fold(&mut self, word: u64) {
        self.0 = self.0.wrapping_mul(31).wrapping_add(word);
    }
}

impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for byte in bytes {
            self.fold(*byte as u64);
        }
    }

    fn write_u8(&mut self, n: u8) {
        self.fold(n as u64);
    }

    fn write_u16(&mut self, n: u16) {
        self.fold(n as u64);
    }

    fn write_u32(&mut self, n: u32) {
        self.fold(n as u64);
    }

    fn write_u64(&mut self, n: u64) {
        self.fold(n);
    }

    fn write_usize(&mut self, n: usize) {
        self.fold(n as u64);
    }

    fn write_i8(&mut self, n: i8) {
        self.fold(n.unsigned_abs() as u64);
    }

    fn write_i16(&mut self, n: i16) {
        self.fold(n.unsigned_abs() as u64);
    }

    fn write_i32(&mut self, n: i32) {
        self.fold(n.unsigned_abs() as u64);
    }

    fn write_i64(&mut self, n: i64) {
        self.fold(n.unsigned_abs());
    }

    fn write_isize(&mut self, n: isize) {
        self.fold(n.unsigned_abs() as u64);
    }

    fn finish(&self) -> u64 {
        self.0
    }
}

/// Builds `IdentityHasher`s on demand
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildIdentityHasher;

impl BuildHasher for BuildIdentityHasher {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> IdentityHasher {
        IdentityHasher(0)
    }
}

//-----------------------------------------------------------------------------------------------//

/// A map between keys and values, implemented as a hash table with separate chaining.
///
/// Every lookup reports the number of comparisons it made (one for hashing the key plus one per
/// entry visited in the bucket) and the time it took.
#[derive(Clone)]
pub struct HashTable<K, V, S = RandomState> {
    bucket: Vec<Sequence<Entry<K, V>>>,
    hasher: S,
}

impl<K, V> HashTable<K, V, RandomState>
where
    K: Hash + PartialEq,
{
    /// Constructor, with a fixed number of buckets.
    ///
    /// Fails with `Error::InvalidArgument` if `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_and_hasher(capacity, RandomState::new())
    }

    /// Constructor, sized for `expected_len` entries at the default load factor
    pub fn sized_for(expected_len: usize) -> Result<Self> {
        Self::with_capacity(TableSizing::default().capacity_for(expected_len)?)
    }
}

impl<K, V, S> HashTable<K, V, S>
where
    K: Hash + PartialEq,
    S: BuildHasher,
{
    /// Constructor, with a fixed number of buckets and a custom hasher.
    ///
    /// Fails with `Error::InvalidArgument` if `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Result<Self> {
        if capacity < 1 {
            return Err(Error::InvalidArgument("capacity must be at least 1"));
        }

        debug!(capacity, "created hash table");

        Ok(HashTable {
            bucket: (0..capacity).map(|_| Sequence::new()).collect(),
            hasher,
        })
    }

    /// Constructor, sized by `sizing` for `expected_len` entries, with a custom hasher
    pub fn with_sizing_and_hasher(
        expected_len: usize,
        sizing: TableSizing,
        hasher: S,
    ) -> Result<Self> {
        Self::with_capacity_and_hasher(sizing.capacity_for(expected_len)?, hasher)
    }

    /// Get the number of buckets
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bucket.len()
    }

    /// Get the bucket a key belongs in
    #[inline]
    pub fn hash_index(&self, key: &K) -> usize {
        (self.hasher.hash_one(key) % self.bucket.len() as u64) as usize
    }

    /// Get the number of entries, summed over the buckets
    pub fn len(&self) -> usize {
        self.bucket.iter().map(Sequence::len).sum()
    }

    /// Check if there are any entries in the table
    pub fn is_empty(&self) -> bool {
        self.bucket.iter().all(Sequence::is_empty)
    }

    /// Insert a key/value pair, returning the index of the bucket it was added to.
    ///
    /// Fails with `Error::DuplicateKey`, leaving the table unchanged, if an equal key is already
    /// present.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize> {
        let index = self.hash_index(&key);
        let bucket = &mut self.bucket[index];

        if bucket.search(&key).is_ok() {
            return Err(Error::DuplicateKey);
        }

        bucket.append(Entry::new(key, value));
        Ok(index)
    }

    /// Look up a key, reporting the work done whether or not it is found
    pub fn probe(&self, key: &K) -> Probe<&V> {
        let mut meter = Meter::start();

        let index = self.hash_index(key);
        meter.tick();

        let found = self.bucket[index].probe(key);
        meter.add(found.stats.comparisons);

        meter.finish(found.value).map(|entry| entry.value())
    }

    /// Get a value by key, with the work done finding it.
    ///
    /// Fails with `Error::NotFound` if the key is not in the table.
    pub fn search(&self, key: &K) -> Result<Lookup<&V>> {
        self.probe(key).found()
    }

    /// Get a mutable reference to a value by key
    pub fn search_mut(&mut self, key: &K) -> Result<&mut V> {
        let index = self.hash_index(key);
        self.bucket[index]
            .find_mut(key)
            .map(|entry| &mut entry.value)
    }

    /// Check if a key is in the table
    pub fn contains_key(&self, key: &K) -> bool {
        let index = self.hash_index(key);
        self.bucket[index].iter().any(|entry| *entry == *key)
    }

    /// Get a mutable reference to a key's value, inserting `make()` first if the key is absent
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> Result<&mut V>
    where
        F: FnOnce() -> V,
    {
        let index = self.hash_index(&key);
        let bucket = &mut self.bucket[index];

        if bucket.search(&key).is_ok() {
            return bucket.find_mut(&key).map(|entry| &mut entry.value);
        }

        bucket.append(Entry::new(key, make()));
        bucket
            .last_mut()
            .map(|entry| &mut entry.value)
            .ok_or(Error::NotFound)
    }

    /// Remove a key, returning its value.
    ///
    /// Fails with `Error::NotFound` if the key is not in the table.
    pub fn delete(&mut self, key: &K) -> Result<V> {
        let index = self.hash_index(key);
        match self.bucket[index].remove_equal(key) {
            Ok(entry) => Ok(entry.into_value()),
            Err(Error::EmptyCollection) => Err(Error::NotFound),
            Err(error) => Err(error),
        }
    }

    /// The buckets, indexed by `hash_index`
    pub fn buckets(&self) -> &[Sequence<Entry<K, V>>] {
        &self.bucket
    }

    /// Iterate over the entries, bucket by bucket
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.bucket
            .iter()
            .flat_map(|bucket| bucket.iter().map(|entry| (&entry.key, &entry.value)))
    }

    /// Describe the table bucket by bucket
    pub fn to_text(&self) -> String
    where
        K: Display,
        V: Display,
    {
        self.to_string()
    }
}

impl<K, V, S> Display for HashTable<K, V, S>
where
    K: Display,
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let len: usize = self.bucket.iter().map(Sequence::len).sum();
        writeln!(
            f,
            "Table with {} positions and {} items",
            self.bucket.len(),
            len
        )?;

        for (index, bucket) in self.bucket.iter().enumerate() {
            if bucket.is_empty() {
                writeln!(f, "Position[{index}]: empty")?;
            } else {
                write!(f, "Position[{index}]: {bucket}")?;
            }
        }
        Ok(())
    }
}

impl<K, V, S> Debug for HashTable<K, V, S>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_map()
            .entries(
                self.bucket
                    .iter()
                    .flat_map(|bucket| bucket.iter().map(|entry| (&entry.key, &entry.value))),
            )
            .finish()
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
fn identity_table<V>(capacity: usize) -> HashTable<i64, V, BuildIdentityHasher> {
    HashTable::with_capacity_and_hasher(capacity, BuildIdentityHasher).unwrap()
}

#[test]
// Colliding keys chain in one bucket
fn test_hash_0() {
    let mut table = identity_table(4);

    assert_eq!(table.insert(0, "zero"), Ok(0));
    assert_eq!(table.insert(4, "four"), Ok(0));
    assert_eq!(table.insert(8, "eight"), Ok(0));
    assert_eq!(table.insert(1, "one"), Ok(1));

    assert_eq!(table.buckets()[0].len(), 3);
    assert_eq!(table.buckets()[1].len(), 1);
    assert_eq!(table.len(), 4);

    // One comparison for the hash and three for the chain
    let lookup = table.search(&8).unwrap();
    assert_eq!(**lookup, "eight");
    assert_eq!(lookup.comparisons(), 4);
    assert_eq!(table.buckets()[0].probe(&8).stats.comparisons, 3);

    assert_eq!(table.search(&1).unwrap().comparisons(), 2);

    let probe = table.probe(&12);
    assert!(!probe.is_hit());
    assert_eq!(probe.stats.comparisons, 4);
    assert_eq!(table.search(&12).unwrap_err(), Error::NotFound);
}

#[test]
// Duplicates are rejected and the table is unchanged
fn test_hash_1() {
    let mut table = identity_table(3);

    table.insert(5, 50).unwrap();
    assert_eq!(table.insert(5, 51), Err(Error::DuplicateKey));
    assert_eq!(table.len(), 1);
    assert_eq!(**table.search(&5).unwrap(), 50);
}

#[test]
// Deleting keys from the middle and the end of a chain
fn test_hash_2() {
    let mut table = identity_table(2);
    for key in [1, 3, 5, 2] {
        table.insert(key, key * 10).unwrap();
    }

    assert_eq!(table.delete(&3), Ok(30));
    assert_eq!(table.delete(&5), Ok(50));
    assert_eq!(table.delete(&3), Err(Error::NotFound));
    assert_eq!(table.delete(&2), Ok(20));
    assert_eq!(table.delete(&4), Err(Error::NotFound));

    assert_eq!(table.len(), 1);
    assert!(table.contains_key(&1));
    assert!(!table.contains_key(&5));

    // The chain still appends after its last entry was removed
    table.insert(7, 70).unwrap();
    let keys: Vec<i64> = table.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![1, 7]);
}

#[test]
// Zero capacity is rejected; negative keys hash to their absolute value
fn test_hash_3() {
    let table: Result<HashTable<i64, ()>> = HashTable::with_capacity(0);
    assert_eq!(
        table.unwrap_err(),
        Error::InvalidArgument("capacity must be at least 1")
    );

    let table: HashTable<i64, (), _> = identity_table(5);
    assert_eq!(table.hash_index(&-7), 2);
    assert_eq!(table.hash_index(&7), 2);
}

#[test]
// The text dump lists every bucket
fn test_hash_4() {
    let mut table = identity_table(3);
    table.insert(3, "c").unwrap();
    table.insert(6, "f").unwrap();
    table.insert(2, "b").unwrap();

    assert_eq!(
        table.to_text(),
        "Table with 3 positions and 3 items\n\
         Position[0]: 3 => c\n6 => f\n\
         Position[1]: empty\n\
         Position[2]: 2 => b\n"
    );
}

#[test]
// Grouping values under a key, creating the group on first sight
fn test_hash_5() {
    let mut table: HashTable<i64, Sequence<&str>, _> = identity_table(7);

    for (product, order) in [(10, "a"), (11, "b"), (10, "c"), (17, "d"), (10, "e")] {
        table
            .get_or_insert_with(product, Sequence::new)
            .unwrap()
            .append(order);
    }

    assert_eq!(table.len(), 3);
    assert_eq!(table.search(&10).unwrap().to_text(), "a\nc\ne\n");
    assert_eq!(table.search(&17).unwrap().len(), 1);

    table.search_mut(&11).unwrap().append("f");
    assert_eq!(table.search(&11).unwrap().to_text(), "b\nf\n");
}

#[test]
// Sizing picks a prime above the expected length over the load factor
fn test_hash_6() {
    let sizing = TableSizing::default();
    assert_eq!(sizing.capacity_for(100), Ok(127));
    assert_eq!(sizing.capacity_for(0), Ok(2));

    let loose = TableSizing { load_factor: 2.0 };
    assert_eq!(loose.capacity_for(20), Ok(11));

    let broken = TableSizing { load_factor: 0.0 };
    assert!(matches!(
        broken.capacity_for(10),
        Err(Error::InvalidArgument(_))
    ));

    let table: HashTable<String, u32> = HashTable::sized_for(1000).unwrap();
    assert_eq!(table.capacity(), 1259);
    assert!(table.is_empty());
}

#[test]
// A stress test with inserting, searching and deleting
fn test_hash_7() {
    use rand::prelude::*;

    const COUNT: usize = 20000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut table = HashTable::sized_for(COUNT).unwrap();
    let mut keys = Vec::with_capacity(COUNT);
    for _ in 0..COUNT {
        let key = rng.random_range(0..u64::MAX);
        table.insert(key, key.to_string()).unwrap();
        keys.push(key);
    }

    assert_eq!(table.len(), COUNT);

    for key in &keys {
        assert_eq!(*table.search(key).unwrap().value(), &key.to_string());
    }

    for key in &keys {
        assert_eq!(table.delete(key), Ok(key.to_string()));
    }
    assert!(table.is_empty());
}

#[test]
// Strings and tuples fold every word, so they spread over the buckets
fn test_hash_8() {
    let build = BuildIdentityHasher;

    // A single integer is its own hash
    assert_eq!(build.hash_one(12345u64), 12345);
    assert_eq!(build.hash_one(-9i32), 9);

    // Strings hash their bytes then a 0xff terminator
    assert_eq!(build.hash_one("a"), 97 * 31 + 0xff);
    assert_ne!(build.hash_one("a"), build.hash_one("b"));

    // Every field of a tuple counts, in order
    assert_eq!(build.hash_one((1u64, 2u64)), 33);
    assert_eq!(build.hash_one((2u64, 1u64)), 63);

    let mut table = HashTable::with_capacity_and_hasher(7, BuildIdentityHasher).unwrap();
    for (n, name) in ["a", "bb", "ccc", "dddd", "zz"].into_iter().enumerate() {
        table.insert(name.to_string(), n).unwrap();
    }

    assert_eq!(table.hash_index(&"a".to_string()), 0);
    assert_eq!(table.hash_index(&"bb".to_string()), 3);
    let used = table.buckets().iter().filter(|bucket| !bucket.is_empty()).count();
    assert!(used > 1);

    assert_eq!(**table.search(&"dddd".to_string()).unwrap(), 3);
    assert_eq!(table.len(), 5);
}

//! The operations shared by every keyed container
//!
//! Code that indexes records only needs to insert, look up and remove them, so it can be written
//! once against `Dictionary` and handed an `OrderedMap`, a `BalancedMap` or a `HashTable`.

use core::{fmt::Display, hash::BuildHasher, hash::Hash};

use crate::{
    compare::Compare,
    error::Result,
    hash::HashTable,
    stats::Lookup,
    tree::{Balance, BinaryTree},
};

//-----------------------------------------------------------------------------------------------//

/// A container mapping unique keys to values
pub trait Dictionary<K, V> {
    /// Insert a key/value pair, returning the new number of pairs.
    ///
    /// Fails with `Error::DuplicateKey` if an equal key is already present.
    fn insert(&mut self, key: K, value: V) -> Result<usize>;

    /// Get a value by key, with the work done finding it.
    ///
    /// Fails with `Error::NotFound` if the key is absent.
    fn search(&self, key: &K) -> Result<Lookup<&V>>;

    /// Remove a key, returning its value.
    ///
    /// Fails with `Error::NotFound` if the key is absent.
    fn delete(&mut self, key: &K) -> Result<V>;

    /// Get the number of pairs
    fn len(&self) -> usize;

    /// Check if there are any pairs
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Describe the whole structure as text
    fn to_text(&self) -> Result<String>;
}

impl<K, V, C, B> Dictionary<K, V> for BinaryTree<K, V, C, B>
where
    V: Display,
    C: Compare<K>,
    B: Balance,
{
    fn insert(&mut self, key: K, value: V) -> Result<usize> {
        BinaryTree::insert(self, key, value)
    }

    fn search(&self, key: &K) -> Result<Lookup<&V>> {
        BinaryTree::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<V> {
        BinaryTree::delete(self, key)
    }

    fn len(&self) -> usize {
        BinaryTree::len(self)
    }

    fn to_text(&self) -> Result<String> {
        self.traverse_in_order()
    }
}

impl<K, V, S> Dictionary<K, V> for HashTable<K, V, S>
where
    K: Hash + PartialEq + Display,
    V: Display,
    S: BuildHasher,
{
    fn insert(&mut self, key: K, value: V) -> Result<usize> {
        HashTable::insert(self, key, value)?;
        Ok(HashTable::len(self))
    }

    fn search(&self, key: &K) -> Result<Lookup<&V>> {
        HashTable::search(self, key)
    }

    fn delete(&mut self, key: &K) -> Result<V> {
        HashTable::delete(self, key)
    }

    fn len(&self) -> usize {
        HashTable::len(self)
    }

    fn to_text(&self) -> Result<String> {
        Ok(HashTable::to_text(self))
    }
}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
use crate::{
    balanced::BalancedMap,
    error::Error,
    hash::BuildIdentityHasher,
    tree::OrderedMap,
};

#[cfg(test)]
// Index some records and report what was found, whatever the container
fn index_records<D: Dictionary<u32, &'static str>>(index: &mut D) -> Vec<u64> {
    for (id, name) in [(30, "bolt"), (10, "nut"), (20, "washer"), (40, "rivet")] {
        index.insert(id, name).unwrap();
    }
    assert_eq!(index.insert(10, "screw"), Err(Error::DuplicateKey));
    assert_eq!(index.len(), 4);

    let mut comparisons = Vec::new();
    for id in [10, 40] {
        comparisons.push(index.search(&id).unwrap().comparisons());
    }
    assert_eq!(**index.search(&20).unwrap(), "washer");
    assert_eq!(index.search(&50).unwrap_err(), Error::NotFound);

    assert_eq!(index.delete(&30), Ok("bolt"));
    assert_eq!(index.delete(&30), Err(Error::NotFound));
    assert_eq!(index.len(), 3);
    assert!(!index.is_empty());

    comparisons
}

#[test]
// The same indexing code runs over each container
fn test_dictionary_0() {
    let mut ordered = OrderedMap::new();
    assert_eq!(index_records(&mut ordered), vec![2, 2]);
    assert_eq!(
        Dictionary::to_text(&ordered),
        Ok("nut\nwasher\nrivet\n".to_string())
    );

    // 30, 10, 20 rotate so 20 is the root, and 40 lands below 30
    let mut balanced = BalancedMap::new();
    assert_eq!(index_records(&mut balanced), vec![2, 3]);
    assert_eq!(
        Dictionary::to_text(&balanced),
        Ok("nut\nwasher\nrivet\n".to_string())
    );

    // 30 and 10 share bucket 2, 20 and 40 share bucket 0
    let mut table = HashTable::with_capacity_and_hasher(4, BuildIdentityHasher).unwrap();
    assert_eq!(index_records(&mut table), vec![3, 3]);
    assert_eq!(
        Dictionary::to_text(&table),
        Ok("Table with 4 positions and 3 items\n\
            Position[0]: 20 => washer\n40 => rivet\n\
            Position[1]: empty\n\
            Position[2]: 10 => nut\n\
            Position[3]: empty\n"
            .to_string())
    );
}

#[test]
// Empty containers
fn test_dictionary_1() {
    let ordered: OrderedMap<u32, &str> = OrderedMap::new();
    assert!(Dictionary::is_empty(&ordered));
    assert_eq!(Dictionary::to_text(&ordered), Err(Error::EmptyState));

    let table: HashTable<u32, &str> = HashTable::with_capacity(2).unwrap();
    assert_eq!(Dictionary::len(&table), 0);
    assert_eq!(
        Dictionary::to_text(&table),
        Ok("Table with 2 positions and 0 items\nPosition[0]: empty\nPosition[1]: empty\n".to_string())
    );
}

//! Implementation of maps backed by binary search trees
#![warn(missing_docs)]

use compact_str::CompactString;
use core::{
    cmp::Ordering,
    fmt::{Debug, Display},
    iter::FusedIterator,
    marker::PhantomData,
};
use tracing::{debug, trace};

use crate::{
    compare::{Compare, Natural},
    error::{Error, Result},
    stats::{Lookup, Meter, Probe},
    util::Tree,
};

//-----------------------------------------------------------------------------------------------//

/// Restores a tree's shape invariant on the way back up from an insertion or deletion.
///
/// `rebalance` is called for every leaf on the path from the changed position up to the root,
/// deepest first, after that leaf's children have been re-attached. It returns the leaf that now
/// roots the subtree (which differs from `x` if it rotated).
pub trait Balance {
    /// Refresh the cached height of `x` and restore the invariant in its subtree
    fn rebalance(tree: &mut Tree, x: usize) -> usize;
}

/// No balancing: the tree's shape follows the insertion order
#[derive(Clone, Copy, Debug, Default)]
pub struct Unbalanced;

impl Balance for Unbalanced {
    #[inline]
    fn rebalance(tree: &mut Tree, x: usize) -> usize {
        tree.update_height(x);
        x
    }
}

//-----------------------------------------------------------------------------------------------//

/// A map between keys and values, implemented using a binary search tree.
///
/// Keys are ordered by a comparator `C` (by default their natural `Ord` ordering) and the shape
/// of the tree is maintained by the policy `B`. See `OrderedMap` and `BalancedMap`.
///
/// Every lookup reports the number of comparisons it made and the time it took.
#[derive(Clone)]
pub struct BinaryTree<K, V, C, B> {
    tree: Tree,
    key_value: Vec<(K, V)>,
    compare: C,
    balance: PhantomData<B>,
}

/// An unbalanced binary search tree
///
/// Searches cost O(height); the height depends on the insertion order and degrades to a list for
/// sorted input.
pub type OrderedMap<K, V, C = Natural> = BinaryTree<K, V, C, Unbalanced>;

impl<K, V, B> BinaryTree<K, V, Natural, B>
where
    K: Ord,
    B: Balance,
{
    /// Constructor
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }

    /// Constructor
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, B> Default for BinaryTree<K, V, Natural, B>
where
    K: Ord,
    B: Balance,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, B> BinaryTree<K, V, C, B> {
    /// Get the number of key/value pairs in the tree
    #[inline]
    pub fn len(&self) -> usize {
        self.tree.count()
    }

    /// Check if there are any key/value pairs in the tree
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Get the height of the tree: -1 when empty, 0 for a single pair
    #[inline]
    pub fn height(&self) -> i32 {
        self.tree.height(self.tree.root())
    }

    /// Check that no subtree is more than one level out of balance. Always true of a
    /// `BalancedMap`, but rarely of a large `OrderedMap`.
    pub fn is_height_balanced(&self) -> bool {
        self.tree.is_height_balanced()
    }

    /// Remove all key/value pairs from the tree
    pub fn clear(&mut self) {
        self.tree.clear();
        self.key_value.truncate(0);
    }

    /// Get the comparator that orders the tree
    #[inline]
    pub fn comparator(&self) -> &C {
        &self.compare
    }

    /// Get the first key in the tree
    pub fn first(&self) -> Option<(&K, &V)> {
        let leaf = self.tree.first(self.tree.root());
        if !leaf == 0 {
            None
        } else {
            let key_value = &self.key_value[leaf];
            Some((&key_value.0, &key_value.1))
        }
    }

    /// Get the last key in the tree
    pub fn last(&self) -> Option<(&K, &V)> {
        let leaf = self.tree.last(self.tree.root());
        if !leaf == 0 {
            None
        } else {
            let key_value = &self.key_value[leaf];
            Some((&key_value.0, &key_value.1))
        }
    }

    /// Iterate over the key/value pairs in key order
    pub fn iter(&self) -> BinaryTreeIterator<'_, K, V, C, B> {
        BinaryTreeIterator {
            map: self,
            leaf: self.tree.first(self.tree.root()),
            count: self.tree.count(),
        }
    }

    /// List the values in key order, one per line.
    ///
    /// Fails with `Error::EmptyState` if the tree is empty.
    pub fn traverse_in_order(&self) -> Result<String>
    where
        V: Display,
    {
        if self.is_empty() {
            return Err(Error::EmptyState);
        }
        Ok(self.to_string())
    }

    // Leaves in key order
    fn leaves(&self) -> impl Iterator<Item = usize> + '_ {
        let mut leaf = self.tree.first(self.tree.root());
        core::iter::from_fn(move || {
            if !leaf == 0 {
                return None;
            }
            let x = leaf;
            leaf = self.tree.next(x);
            Some(x)
        })
    }
}

impl<K, V, C, B> BinaryTree<K, V, C, B>
where
    C: Compare<K>,
    B: Balance,
{
    /// Constructor, ordering keys with a custom comparator
    pub fn with_comparator(compare: C) -> Self {
        BinaryTree {
            tree: Tree::new(),
            key_value: Vec::new(),
            compare,
            balance: PhantomData,
        }
    }

    /// Constructor, ordering keys with a custom comparator
    pub fn with_capacity_and_comparator(capacity: usize, compare: C) -> Self {
        BinaryTree {
            tree: Tree::with_capacity(capacity),
            key_value: Vec::with_capacity(capacity),
            compare,
            balance: PhantomData,
        }
    }

    /// Build a new index over the values of `source`, keyed by `key_of` and ordered by `compare`.
    ///
    /// The source is walked in order and every value is cloned into the new tree; the source is
    /// left untouched. Fails with `Error::DuplicateKey` if `key_of` maps two values to keys that
    /// compare equal. Use `Rc` or `Arc` values to share rather than copy the records.
    pub fn rekey<J, D, A, F>(
        source: &BinaryTree<J, V, D, A>,
        mut key_of: F,
        compare: C,
    ) -> Result<Self>
    where
        V: Clone,
        F: FnMut(&V) -> K,
    {
        let mut target = Self::with_capacity_and_comparator(source.len(), compare);
        for (_, value) in source.iter() {
            target.insert(key_of(value), value.clone())?;
        }

        debug!(
            source = source.len(),
            target = target.len(),
            "rekeyed binary tree"
        );
        Ok(target)
    }

    /// Build a new index over the values of `source`, moving them out of it.
    ///
    /// This behaves like `rekey` but consumes the source instead of cloning its values.
    pub fn rekey_owned<J, D, A, F>(
        source: BinaryTree<J, V, D, A>,
        mut key_of: F,
        compare: C,
    ) -> Result<Self>
    where
        F: FnMut(&V) -> K,
    {
        let count = source.len();
        let order: Vec<usize> = source.leaves().collect();

        let mut slot: Vec<Option<V>> = source
            .key_value
            .into_iter()
            .map(|(_, value)| Some(value))
            .collect();

        let mut target = Self::with_capacity_and_comparator(count, compare);
        for leaf in order {
            if let Some(value) = slot[leaf].take() {
                target.insert(key_of(&value), value)?;
            }
        }

        debug!(source = count, target = target.len(), "rekeyed binary tree");
        Ok(target)
    }

    /// Look up a key, reporting the work done whether or not it is found.
    ///
    /// One comparison is counted for every node visited on the way down from the root.
    pub fn probe(&self, key: &K) -> Probe<&V> {
        let mut meter = Meter::start();
        let mut x = self.tree.root();

        while !x != 0 {
            meter.tick();
            match self.compare.compare(key, &self.key_value[x].0) {
                Ordering::Equal => return meter.finish(Some(&self.key_value[x].1)),
                Ordering::Less => x = self.tree.left(x),
                Ordering::Greater => x = self.tree.right(x),
            }
        }

        meter.finish(None)
    }

    /// Get a value by key, with the work done finding it.
    ///
    /// Fails with `Error::NotFound` if the key is not in the tree.
    pub fn search(&self, key: &K) -> Result<Lookup<&V>> {
        self.probe(key).found()
    }

    /// Get a mutable reference to a value by key
    pub fn search_mut(&mut self, key: &K) -> Result<&mut V> {
        let x = self.locate(key);
        if !x == 0 {
            return Err(Error::NotFound);
        }
        Ok(&mut self.key_value[x].1)
    }

    /// Check if a key is in the tree
    pub fn contains_key(&self, key: &K) -> bool {
        !self.locate(key) != 0
    }

    /// Insert a key/value pair, returning the new number of pairs.
    ///
    /// Fails with `Error::DuplicateKey`, leaving the tree unchanged, if an equal key is already
    /// present.
    pub fn insert(&mut self, key: K, value: V) -> Result<usize> {
        // Find where the new leaf goes before writing anything
        let mut parent = !0;
        let mut ordering = Ordering::Equal;
        let mut x = self.tree.root();

        while !x != 0 {
            ordering = self.compare.compare(&key, &self.key_value[x].0);
            parent = x;
            x = match ordering {
                Ordering::Less => self.tree.left(x),
                Ordering::Greater => self.tree.right(x),
                Ordering::Equal => return Err(Error::DuplicateKey),
            };
        }

        let leaf = self.tree.alloc();
        debug_assert_eq!(leaf, self.key_value.len());
        self.key_value.push((key, value));

        if !parent == 0 {
            self.tree.set_root(leaf);
        } else if ordering == Ordering::Less {
            self.tree.set_left(parent, leaf);
        } else {
            self.tree.set_right(parent, leaf);
        }

        self.rebalance_from(parent);
        Ok(self.len())
    }

    /// Remove a key, returning its value.
    ///
    /// A pair with two children is replaced by its in-order predecessor, whose key and value are
    /// moved into the removed pair's position. Fails with `Error::NotFound`, leaving the tree
    /// unchanged, if the key is not present.
    pub fn delete(&mut self, key: &K) -> Result<V> {
        let x = self.locate(key);
        if !x == 0 {
            return Err(Error::NotFound);
        }

        // The leaf to unlink has at most one child
        let l = self.tree.left(x);
        let detached = if !l != 0 && !self.tree.right(x) != 0 {
            let predecessor = self.tree.last(l);
            trace!(target = x, predecessor, "replacing by predecessor");
            self.key_value.swap(x, predecessor);
            predecessor
        } else {
            x
        };

        let child = if !self.tree.left(detached) != 0 {
            self.tree.left(detached)
        } else {
            self.tree.right(detached)
        };

        let parent = self.tree.parent(detached);
        self.replace_child(parent, detached, child);
        self.rebalance_from(parent);

        self.tree.free(detached);
        let (_, value) = self.key_value.swap_remove(detached);
        Ok(value)
    }

    // Find the leaf holding a key, or `!0`
    fn locate(&self, key: &K) -> usize {
        let mut x = self.tree.root();

        while !x != 0 {
            match self.compare.compare(key, &self.key_value[x].0) {
                Ordering::Equal => return x,
                Ordering::Less => x = self.tree.left(x),
                Ordering::Greater => x = self.tree.right(x),
            }
        }

        !0
    }

    // Put `child` where `x` hangs below `parent`, or make it the root if `parent` is `!0`
    fn replace_child(&mut self, parent: usize, x: usize, child: usize) {
        if !parent == 0 {
            self.tree.set_root(child);
        } else if self.tree.left(parent) == x {
            self.tree.set_left(parent, child);
        } else {
            self.tree.set_right(parent, child);
        }
    }

    // Rebalance every leaf from `x` up to the root, deepest first, re-attaching each subtree in
    // case it rotated
    fn rebalance_from(&mut self, mut x: usize) {
        while !x != 0 {
            let parent = self.tree.parent(x);
            let y = B::rebalance(&mut self.tree, x);
            self.replace_child(parent, x, y);
            x = parent;
        }
    }

    #[cfg(test)]
    pub(crate) fn root_key(&self) -> Option<&K> {
        let root = self.tree.root();
        if !root == 0 {
            None
        } else {
            Some(&self.key_value[root].0)
        }
    }

    #[cfg(test)]
    pub(crate) fn children_keys(&self, key: &K) -> (Option<&K>, Option<&K>) {
        let x = self.locate(key);
        let key_of = |y: usize| {
            if !y == 0 {
                None
            } else {
                Some(&self.key_value[y].0)
            }
        };
        (key_of(self.tree.left(x)), key_of(self.tree.right(x)))
    }

    #[cfg(test)]
    pub(crate) fn check(&self) {
        self.tree.check();
        for (a, b) in self.leaves().zip(self.leaves().skip(1)) {
            assert_eq!(
                self.compare.compare(&self.key_value[a].0, &self.key_value[b].0),
                Ordering::Less
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn check_balanced(&self) -> i32 {
        self.check();
        self.tree.check_balanced()
    }
}

impl<V, C, B> BinaryTree<CompactString, V, C, B>
where
    C: Compare<CompactString>,
    B: Balance,
{
    /// Build a new index over the values of `source`, keyed by a name taken from each value.
    ///
    /// Names are stored as `CompactString`, so short names need no heap allocation of their own.
    pub fn rekey_by_name<J, D, A, F>(
        source: &BinaryTree<J, V, D, A>,
        name_of: F,
        compare: C,
    ) -> Result<Self>
    where
        V: Clone,
        F: Fn(&V) -> &str,
    {
        Self::rekey(source, |value| CompactString::new(name_of(value)), compare)
    }

    /// Get a value by name
    pub fn search_str(&self, name: &str) -> Result<Lookup<&V>> {
        self.search(&CompactString::new(name))
    }
}

impl<K, V, C, B> Display for BinaryTree<K, V, C, B>
where
    V: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut leaf = self.tree.first(self.tree.root());
        while !leaf != 0 {
            writeln!(f, "{}", self.key_value[leaf].1)?;
            leaf = self.tree.next(leaf);
        }
        Ok(())
    }
}

impl<K, V, C, B> Debug for BinaryTree<K, V, C, B>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        let mut leaf = self.tree.first(self.tree.root());
        while !leaf != 0 {
            let key_value = &self.key_value[leaf];
            map.entry(&key_value.0, &key_value.1);
            leaf = self.tree.next(leaf);
        }
        map.finish()
    }
}

impl<'a, K, V, C, B> IntoIterator for &'a BinaryTree<K, V, C, B> {
    type Item = (&'a K, &'a V);
    type IntoIter = BinaryTreeIterator<'a, K, V, C, B>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `BinaryTree`, in key order
pub struct BinaryTreeIterator<'a, K, V, C, B> {
    map: &'a BinaryTree<K, V, C, B>,
    leaf: usize,
    count: usize,
}

impl<'a, K, V, C, B> Iterator for BinaryTreeIterator<'a, K, V, C, B> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<(&'a K, &'a V)> {
        if !self.leaf == 0 {
            return None;
        }

        let leaf = self.leaf;
        self.leaf = self.map.tree.next(self.leaf);
        self.count -= 1;

        let key_value = &self.map.key_value[leaf];
        Some((&key_value.0, &key_value.1))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<K, V, C, B> FusedIterator for BinaryTreeIterator<'_, K, V, C, B> {}

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
use crate::compare::ignore_ascii_case;

#[cfg(test)]
// The tree    5
//           /   \
//          3     8
//         / \   / \
//        1   4 7   9
fn sample() -> OrderedMap<i32, String> {
    let mut map = OrderedMap::new();
    for key in [5, 3, 8, 1, 4, 7, 9] {
        map.insert(key, key.to_string()).unwrap();
    }
    map
}

#[test]
// A very simple test of inserting into a map
fn test_ordered_0() {
    let mut map = OrderedMap::new();

    assert_eq!(map.insert(5, "Five".to_string()), Ok(1));
    assert_eq!(map.insert(1, "One".to_string()), Ok(2));
    assert_eq!(map.insert(9, "Nine".to_string()), Ok(3));

    assert_eq!(**map.search(&5).unwrap(), "Five");
    assert_eq!(map.search(&4).unwrap_err(), Error::NotFound);

    let v: Vec<(i32, String)> = map.iter().map(|(k, v)| (*k, v.clone())).collect();
    assert_eq!(
        v,
        vec![
            (1, "One".to_string()),
            (5, "Five".to_string()),
            (9, "Nine".to_string())
        ]
    );
    map.check();
}

#[test]
// Comparisons count the nodes visited on the way down
fn test_ordered_1() {
    let map = sample();

    assert_eq!(map.search(&5).unwrap().comparisons(), 1);
    assert_eq!(map.search(&3).unwrap().comparisons(), 2);
    assert_eq!(map.search(&7).unwrap().comparisons(), 3);

    let probe = map.probe(&6);
    assert!(!probe.is_hit());
    assert_eq!(probe.stats.comparisons, 3);

    let empty: OrderedMap<i32, String> = OrderedMap::new();
    assert_eq!(empty.probe(&1).stats.comparisons, 0);
}

#[test]
// A duplicate key is rejected and nothing changes
fn test_ordered_2() {
    let mut map = sample();

    assert_eq!(map.insert(4, "Four again".to_string()), Err(Error::DuplicateKey));
    assert_eq!(map.len(), 7);
    assert_eq!(**map.search(&4).unwrap(), "4");
    assert_eq!(map.height(), 2);
    map.check();
}

#[test]
// Deleting a leaf, a node with one child and a node with two children
fn test_ordered_3() {
    let mut map = sample();

    // Leaf
    assert_eq!(map.delete(&1), Ok("1".to_string()));
    assert_eq!(map.children_keys(&3), (None, Some(&4)));
    map.check();

    // One child: 3 is replaced by 4
    assert_eq!(map.delete(&3), Ok("3".to_string()));
    assert_eq!(map.children_keys(&5), (Some(&4), Some(&8)));
    map.check();

    // Two children: 8 takes its predecessor 7
    assert_eq!(map.delete(&8), Ok("8".to_string()));
    assert_eq!(map.children_keys(&5), (Some(&4), Some(&7)));
    assert_eq!(map.children_keys(&7), (None, Some(&9)));
    map.check();

    // The root with two children takes its predecessor 4
    assert_eq!(map.delete(&5), Ok("5".to_string()));
    assert_eq!(map.root_key(), Some(&4));
    assert_eq!(map.len(), 3);
    map.check();

    assert_eq!(map.delete(&5), Err(Error::NotFound));
    assert_eq!(map.len(), 3);

    let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![4, 7, 9]);
}

#[test]
// In-order traversal lists values in key order, and fails on an empty tree
fn test_ordered_4() {
    let mut map: OrderedMap<i32, i32, _> = OrderedMap::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    for key in [2, 3, 1] {
        map.insert(key, key * 10).unwrap();
    }

    assert_eq!(map.traverse_in_order(), Ok("30\n20\n10\n".to_string()));
    assert_eq!(map.first(), Some((&3, &30)));
    assert_eq!(map.last(), Some((&1, &10)));

    map.clear();
    assert_eq!(map.traverse_in_order(), Err(Error::EmptyState));
    assert_eq!(map.height(), -1);
}

#[test]
// Re-keying by a derived key keeps every value
fn test_ordered_5() {
    let by_id = sample();

    let by_text: OrderedMap<String, String> =
        OrderedMap::rekey(&by_id, |value| format!("#{value}"), Natural).unwrap();

    assert_eq!(by_text.len(), by_id.len());
    assert_eq!(**by_text.search(&"#8".to_string()).unwrap(), "8");
    by_text.check();

    // A projection that is not injective fails
    let collapsed = OrderedMap::<usize, String>::rekey(&by_id, |value| value.len(), Natural);
    assert_eq!(collapsed.unwrap_err(), Error::DuplicateKey);
}

#[test]
// Re-keying by name, ignoring case, and by moving the values
fn test_ordered_6() {
    let mut by_id = OrderedMap::new();
    by_id.insert(10, "Widget".to_string()).unwrap();
    by_id.insert(20, "gear".to_string()).unwrap();
    by_id.insert(30, "Sprocket".to_string()).unwrap();

    let by_name: OrderedMap<CompactString, String, _> = OrderedMap::rekey_by_name(
        &by_id,
        |value: &String| value.as_str(),
        ignore_ascii_case::<CompactString>,
    )
    .unwrap();

    assert_eq!(**by_name.search_str("WIDGET").unwrap(), "Widget");
    assert_eq!(by_name.first().map(|(k, _)| k.as_str()), Some("gear"));
    assert_eq!(by_name.traverse_in_order(), Ok("gear\nSprocket\nWidget\n".to_string()));

    let by_length: OrderedMap<usize, String> =
        OrderedMap::rekey_owned(by_id, |value| value.len(), Natural).unwrap();
    let values: Vec<&str> = by_length.iter().map(|(_, v)| v.as_str()).collect();
    assert_eq!(values, vec!["gear", "Widget", "Sprocket"]);
}

#[test]
// Values can be updated in place
fn test_ordered_7() {
    let mut map = sample();

    map.search_mut(&7).unwrap().push('!');
    assert_eq!(**map.search(&7).unwrap(), "7!");
    assert_eq!(map.search_mut(&6).unwrap_err(), Error::NotFound);
    assert!(map.contains_key(&9));
    assert!(!map.contains_key(&10));
}

#[test]
// A stress test with inserting and searching
fn test_ordered_8() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut map = OrderedMap::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        let value = key.to_string();
        map.insert(key, value).unwrap();
    }

    assert_eq!(map.len(), COUNT);
    map.check();

    let mut rng = SmallRng::seed_from_u64(1234567890);

    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        let value = key.to_string();
        assert_eq!(*map.search(&key).unwrap().value(), &value);
    }
}

#[test]
// A stress test with inserting and deleting
fn test_ordered_9() {
    use rand::prelude::*;

    const COUNT: usize = 100000;

    let mut rng = SmallRng::seed_from_u64(5678901234);

    let mut map = OrderedMap::new();
    for _ in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        map.insert(key, key.to_string()).unwrap();
    }

    let mut rng = SmallRng::seed_from_u64(5678901234);

    for i in 0..COUNT {
        let key = rng.random_range(0..usize::MAX);
        assert_eq!(map.delete(&key), Ok(key.to_string()));
        if i % 10000 == 0 {
            map.check();
        }
    }

    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
}

#[test]
// Ascending keys build a single chain as deep as the tree is long
fn test_ordered_10() {
    const COUNT: u32 = 20000;

    let mut map = OrderedMap::new();
    for id in 0..COUNT {
        assert_eq!(map.insert(id, id), Ok(id as usize + 1));
    }

    assert_eq!(map.height(), COUNT as i32 - 1);
    assert!(!map.is_height_balanced());
    assert_eq!(
        map.search(&(COUNT - 1)).unwrap().comparisons(),
        COUNT as u64
    );
    assert_eq!(map.insert(COUNT - 1, 0), Err(Error::DuplicateKey));

    // Re-keying walks the chain in order
    let reversed: OrderedMap<u32, u32, _> =
        OrderedMap::rekey(&map, |id| *id, |a: &u32, b: &u32| b.cmp(a)).unwrap();
    assert_eq!(reversed.height(), COUNT as i32 - 1);
    assert_eq!(reversed.first(), Some((&(COUNT - 1), &(COUNT - 1))));

    // Deleting the deepest key shortens the chain by one
    assert_eq!(map.delete(&(COUNT - 1)), Ok(COUNT - 1));
    assert_eq!(map.height(), COUNT as i32 - 2);

    for id in 0..COUNT - 1 {
        assert_eq!(map.delete(&id), Ok(id));
    }
    assert!(map.is_empty());
    assert_eq!(map.height(), -1);
}

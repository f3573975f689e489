//! Height balanced binary search trees
//!
//! A `BalancedMap` is a `BinaryTree` whose `Balance` policy rotates on the way back up from every
//! insertion and deletion, so that the heights of sibling subtrees never differ by more than one.
//! Searches therefore cost O(log n) comparisons whatever the insertion order.

use tracing::trace;

use crate::{
    compare::Natural,
    tree::{Balance, BinaryTree},
    util::Tree,
};

//-----------------------------------------------------------------------------------------------//

/// Keeps every subtree within one level of balance using single and double rotations
#[derive(Clone, Copy, Debug, Default)]
pub struct HeightBalanced;

impl Balance for HeightBalanced {
    fn rebalance(tree: &mut Tree, x: usize) -> usize {
        tree.update_height(x);

        let balance = tree.balance(x);

        if balance > 1 {
            let l = tree.left(x);
            if tree.balance(l) < 0 {
                // Left-right
                let y = rotate_left(tree, l);
                tree.set_left(x, y);
            }
            // Left-left
            return rotate_right(tree, x);
        }

        if balance < -1 {
            let r = tree.right(x);
            if tree.balance(r) > 0 {
                // Right-left
                let y = rotate_right(tree, r);
                tree.set_right(x, y);
            }
            // Right-right
            return rotate_left(tree, x);
        }

        x
    }
}

fn rotate_left(tree: &mut Tree, pivot: usize) -> usize {
    trace!(pivot, height = tree.height(pivot), "rotate left");
    #[cfg(test)]
    ROTATIONS.with(|count| count.set((count.get().0 + 1, count.get().1)));
    tree.rotate_left(pivot)
}

fn rotate_right(tree: &mut Tree, pivot: usize) -> usize {
    trace!(pivot, height = tree.height(pivot), "rotate right");
    #[cfg(test)]
    ROTATIONS.with(|count| count.set((count.get().0, count.get().1 + 1)));
    tree.rotate_right(pivot)
}

#[cfg(test)]
thread_local! {
    // Left and right rotations made on this thread
    static ROTATIONS: core::cell::Cell<(u32, u32)> = const { core::cell::Cell::new((0, 0)) };
}

// Get and reset the (left, right) rotation counts
#[cfg(test)]
fn take_rotations() -> (u32, u32) {
    ROTATIONS.with(|count| count.replace((0, 0)))
}

/// A height balanced (AVL) binary search tree
pub type BalancedMap<K, V, C = Natural> = BinaryTree<K, V, C, HeightBalanced>;

//-----------------------------------------------------------------------------------------------//

#[cfg(test)]
use crate::{error::Error, tree::OrderedMap};

#[test]
// Ascending keys 1, 2, 3 rotate left once so 2 becomes the root
fn test_balanced_0() {
    take_rotations();

    let mut map = BalancedMap::new();
    map.insert(1, 100).unwrap();
    map.insert(2, 200).unwrap();
    assert_eq!(take_rotations(), (0, 0));
    assert_eq!(map.height(), 1);

    map.insert(3, 300).unwrap();
    assert_eq!(take_rotations(), (1, 0));

    assert_eq!(map.root_key(), Some(&2));
    assert_eq!(map.children_keys(&2), (Some(&1), Some(&3)));
    assert_eq!(map.height(), 1);
    map.check_balanced();
}

#[test]
// The four rotation cases
fn test_balanced_1() {
    // Left-left, left-right, right-right and right-left
    let cases = [
        ([3, 2, 1], (0, 1)),
        ([3, 1, 2], (1, 1)),
        ([1, 2, 3], (1, 0)),
        ([1, 3, 2], (1, 1)),
    ];

    for (keys, rotations) in cases {
        take_rotations();

        let mut map = BalancedMap::new();
        for key in keys {
            map.insert(key, ()).unwrap();
        }

        assert_eq!(take_rotations(), rotations, "inserting {keys:?}");
        assert_eq!(map.root_key(), Some(&2), "inserting {keys:?}");
        assert_eq!(map.children_keys(&2), (Some(&1), Some(&3)));
        map.check_balanced();
    }
}

#[test]
// Sorted input stays logarithmic, unlike the unbalanced tree
fn test_balanced_2() {
    const COUNT: i32 = 1023;

    let mut balanced = BalancedMap::new();
    let mut ordered = OrderedMap::new();
    for key in 0..COUNT {
        balanced.insert(key, key).unwrap();
        ordered.insert(key, key).unwrap();
    }

    // A perfect tree of 1023 keys has height 9
    assert_eq!(balanced.check_balanced(), 9);
    assert_eq!(ordered.height(), COUNT - 1);
    assert!(!ordered.is_height_balanced());

    assert!(balanced.search(&(COUNT - 1)).unwrap().comparisons() <= 10);
    assert_eq!(
        ordered.search(&(COUNT - 1)).unwrap().comparisons(),
        COUNT as u64
    );
}

#[test]
// Deleting may rebalance every ancestor up to the root
fn test_balanced_3() {
    // A minimal tree of height 4 (a Fibonacci tree): removing the deepest key on the short side
    // unbalances the root after its subtree has been repaired.
    let mut map = BalancedMap::new();
    for key in [8, 5, 11, 3, 7, 10, 12, 2, 4, 6, 9, 1] {
        map.insert(key, key).unwrap();
        map.check_balanced();
    }
    assert_eq!(map.height(), 4);

    assert_eq!(map.delete(&12), Ok(12));
    map.check_balanced();
    assert_eq!(map.height(), 3);
    assert_eq!(map.root_key(), Some(&5));

    let keys: Vec<i32> = map.iter().map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
}

#[test]
// Deleting a key with two children uses its predecessor and stays balanced
fn test_balanced_4() {
    let mut map = BalancedMap::new();
    for key in 1..=7 {
        map.insert(key, key.to_string()).unwrap();
    }
    assert_eq!(map.root_key(), Some(&4));

    assert_eq!(map.delete(&4), Ok("4".to_string()));
    assert_eq!(map.root_key(), Some(&3));
    map.check_balanced();

    assert_eq!(map.delete(&4), Err(Error::NotFound));
    assert_eq!(map.insert(3, "three".to_string()), Err(Error::DuplicateKey));
    assert_eq!(map.len(), 6);
    map.check_balanced();
}

#[test]
// Re-keying a balanced tree by a reversed order yields a balanced tree
fn test_balanced_5() {
    let mut by_id = BalancedMap::new();
    for key in 0..100 {
        by_id.insert(key, key * 2).unwrap();
    }

    let by_value: BalancedMap<i32, i32, _> =
        BalancedMap::rekey(&by_id, |value| *value, |a: &i32, b: &i32| b.cmp(a)).unwrap();

    assert_eq!(by_value.len(), 100);
    assert_eq!(by_value.first(), Some((&198, &198)));
    by_value.check_balanced();
}

#[test]
// A stress test with inserting and deleting, checking the balance throughout
fn test_balanced_6() {
    use rand::prelude::*;

    const COUNT: usize = 20000;

    let mut rng = SmallRng::seed_from_u64(9876543210);

    let mut map = BalancedMap::new();
    let mut keys = Vec::with_capacity(COUNT);
    for _ in 0..COUNT {
        let key = rng.random_range(0..u64::MAX);
        map.insert(key, key.to_string()).unwrap();
        keys.push(key);
    }

    let height = map.check_balanced();
    assert!(height <= 20, "height {height} is too large for {COUNT} keys");

    keys.shuffle(&mut rng);
    for (i, key) in keys.iter().enumerate() {
        assert_eq!(map.delete(key), Ok(key.to_string()));
        if i % 1000 == 0 {
            map.check_balanced();
        }
    }

    assert!(map.is_empty());
    assert_eq!(map.height(), -1);
}

#[test]
// Ascending ids, as a record index receives them, stay shallow
fn test_balanced_7() {
    const COUNT: u32 = 100000;

    let mut map = BalancedMap::new();
    for id in 0..COUNT {
        map.insert(id, id).unwrap();
    }

    assert!(map.is_height_balanced());
    // log2(100000) is about 16.6
    assert!(map.height() <= 17);
    assert!(map.search(&(COUNT - 1)).unwrap().comparisons() <= 18);

    for id in 0..COUNT {
        assert_eq!(map.delete(&id), Ok(id));
        if id % 10000 == 0 {
            assert!(map.is_height_balanced());
        }
    }
    assert!(map.is_empty());
}

//! Utility types to support binary search trees stored in an index arena

#![warn(missing_docs)]

use core::fmt::Display;

//-----------------------------------------------------------------------------------------------//

// A leaf in a binary tree
#[derive(Clone, Debug)]
struct Leaf {
    parent: usize,
    left: usize,
    right: usize,
    height: i32,
}

//-----------------------------------------------------------------------------------------------//

/// A tree of integer leaves
///
/// `Tree` manages the shape of a binary tree whose leaves are the indices `0..count()`. It does
/// not store keys or values: a collection keeps those in a vector aligned with the leaves, and
/// mirrors the `swap_remove` performed by `free` on its own vector. An empty subtree is `!0`.
///
/// Every leaf caches its height (a lone leaf has height 0, an empty subtree -1). Links must be
/// changed through `set_left`, `set_right` and `set_root` so parent links stay consistent; heights
/// are only refreshed by `update_height` and the rotations.
#[derive(Clone, Debug)]
pub struct Tree {
    leaf: Vec<Leaf>,
    root: usize,
}

impl Tree {
    /// Construct an empty tree
    pub fn new() -> Tree {
        Tree {
            leaf: Vec::new(),
            root: !0,
        }
    }

    /// Construct an empty tree, pre-allocating a given capacity
    pub fn with_capacity(capacity: usize) -> Tree {
        Tree {
            leaf: Vec::with_capacity(capacity),
            root: !0,
        }
    }

    /// Get the number of leaves in the tree
    #[inline]
    pub fn count(&self) -> usize {
        self.leaf.len()
    }

    /// Check if the tree has no leaves
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.leaf.is_empty()
    }

    /// Remove all leaves from the tree
    pub fn clear(&mut self) {
        self.leaf.truncate(0);
        self.root = !0;
    }

    /// Reserves capacity for at least `additional` more leaves
    pub fn reserve(&mut self, additional: usize) {
        self.leaf.reserve(additional);
    }

    /// Get the root leaf, or `!0` if the tree is empty
    #[inline]
    pub fn root(&self) -> usize {
        self.root
    }

    /// Make `x` the root of the tree
    #[inline]
    pub fn set_root(&mut self, x: usize) {
        self.root = x;
        if !x != 0 {
            self.leaf[x].parent = !0;
        }
    }

    /// Get the left child of a leaf
    #[inline]
    pub fn left(&self, x: usize) -> usize {
        self.leaf[x].left
    }

    /// Get the right child of a leaf
    #[inline]
    pub fn right(&self, x: usize) -> usize {
        self.leaf[x].right
    }

    /// Get the parent of a leaf, which is `!0` for the root
    #[inline]
    pub fn parent(&self, x: usize) -> usize {
        self.leaf[x].parent
    }

    /// Attach `child` (possibly `!0`) as the left subtree of `x`
    #[inline]
    pub fn set_left(&mut self, x: usize, child: usize) {
        self.leaf[x].left = child;
        if !child != 0 {
            self.leaf[child].parent = x;
        }
    }

    /// Attach `child` (possibly `!0`) as the right subtree of `x`
    #[inline]
    pub fn set_right(&mut self, x: usize, child: usize) {
        self.leaf[x].right = child;
        if !child != 0 {
            self.leaf[child].parent = x;
        }
    }

    /// Get the cached height of a subtree, -1 if it is empty
    #[inline]
    pub fn height(&self, x: usize) -> i32 {
        if !x == 0 {
            -1
        } else {
            self.leaf[x].height
        }
    }

    /// Recompute the height of a leaf from its children
    #[inline]
    pub fn update_height(&mut self, x: usize) {
        let l = self.leaf[x].left;
        let r = self.leaf[x].right;
        self.leaf[x].height = 1 + self.height(l).max(self.height(r));
    }

    /// Get the balance factor of a leaf: the height of the left subtree minus that of the right
    #[inline]
    pub fn balance(&self, x: usize) -> i32 {
        if !x == 0 {
            return 0;
        }
        self.height(self.leaf[x].left) - self.height(self.leaf[x].right)
    }

    /// Rotate the subtree at `x` to the right
    ///
    /// The left child of `x` is promoted to take its place and `x` adopts the promoted leaf's right
    /// subtree as its new left subtree. Both heights are refreshed. The new subtree root is
    /// returned; it keeps the parent link of `x`, but it is the caller's job to re-attach it to
    /// that parent (or make it the root).
    pub fn rotate_right(&mut self, x: usize) -> usize {
        let y = self.leaf[x].left;
        debug_assert!(!y != 0);

        let parent = self.leaf[x].parent;
        let b = self.leaf[y].right;

        self.set_left(x, b);
        self.set_right(y, x);
        self.leaf[y].parent = parent;

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Rotate the subtree at `x` to the left
    ///
    /// This is the mirror image of `rotate_right`.
    pub fn rotate_left(&mut self, x: usize) -> usize {
        let y = self.leaf[x].right;
        debug_assert!(!y != 0);

        let parent = self.leaf[x].parent;
        let b = self.leaf[y].left;

        self.set_right(x, b);
        self.set_left(y, x);
        self.leaf[y].parent = parent;

        self.update_height(x);
        self.update_height(y);
        y
    }

    /// Get the first leaf in the subtree at `x`, or in the whole tree if `x` is the root
    #[inline]
    pub fn first(&self, x: usize) -> usize {
        first(&self.leaf, x)
    }

    /// Get the last leaf in the subtree at `x`
    #[inline]
    pub fn last(&self, x: usize) -> usize {
        last(&self.leaf, x)
    }

    /// Get the previous leaf in the tree
    #[inline]
    pub fn prev(&self, x: usize) -> usize {
        prev(&self.leaf, x)
    }

    /// Get the next leaf in the tree
    #[inline]
    pub fn next(&self, x: usize) -> usize {
        next(&self.leaf, x)
    }

    /// Allocate a new, unattached leaf of height 0
    ///
    /// The new leaf is always `count()` before the call, so a collection pushes the matching key
    /// and value onto its own vector.
    pub fn alloc(&mut self) -> usize {
        let x = self.leaf.len();
        self.leaf.push(Leaf {
            parent: !0,
            left: !0,
            right: !0,
            height: 0,
        });
        x
    }

    /// Free a leaf that has already been detached from the tree
    ///
    /// The last leaf is moved into the freed slot (exactly as `Vec::swap_remove` would) and its
    /// neighbours are re-linked, so a collection must `swap_remove` the same index from its own
    /// vector. No leaf index held by the caller other than the last one is invalidated.
    pub fn free(&mut self, x: usize) {
        let last = self.leaf.len() - 1;
        self.leaf.swap_remove(x);

        if x == last {
            return;
        }

        let moved = self.leaf[x].clone();

        if !moved.parent == 0 {
            self.root = x;
        } else if self.leaf[moved.parent].left == last {
            self.leaf[moved.parent].left = x;
        } else {
            debug_assert_eq!(self.leaf[moved.parent].right, last);
            self.leaf[moved.parent].right = x;
        }

        if !moved.left != 0 {
            self.leaf[moved.left].parent = x;
        }

        if !moved.right != 0 {
            self.leaf[moved.right].parent = x;
        }
    }

    /// Check that the heights of sibling subtrees differ by at most one at every leaf
    pub fn is_height_balanced(&self) -> bool {
        (0..self.leaf.len()).all(|x| self.balance(x).abs() <= 1)
    }

    // Debug tests
    #[cfg(any(test, debug_assertions))]
    #[allow(dead_code)]
    pub(crate) fn check(&self) {
        check_tree(&self.leaf, self.root);
        debug_assert_eq!(check_count(&self.leaf, self.root), self.count());
        check_heights(&self.leaf, self.root);
    }

    // Check every leaf is within one level of balance, returning the height of the tree
    #[cfg(test)]
    pub(crate) fn check_balanced(&self) -> i32 {
        check_balanced(&self.leaf, self.root)
    }
}

impl Default for Tree {
    fn default() -> Self {
        Tree::new()
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "[ ")?;
        let mut leaf = self.first(self.root);
        while !leaf != 0 {
            write!(f, "{leaf} ")?;
            leaf = self.next(leaf);
        }
        write!(f, "]")?;
        Ok(())
    }
}

//-----------------------------------------------------------------------------------------------//

// IMPLEMENTATION NOTE
//
// The functions below are low level walks over the leaves. They follow parent links, so they rely
// on the links having been maintained through `set_left`, `set_right` and `set_root`.

// Get the first leaf (the left-most) of a subtree
fn first(leaf: &[Leaf], mut x: usize) -> usize {
    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].left;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the last leaf (the right-most) of a subtree
fn last(leaf: &[Leaf], mut x: usize) -> usize {
    if !x == 0 {
        return !0;
    }

    loop {
        let y = leaf[x].right;
        if !y == 0 {
            return x;
        }
        x = y;
    }
}

// Get the logical predecessor to a leaf
fn prev(leaf: &[Leaf], mut x: usize) -> usize {
    let y = leaf[x].left;
    if !y != 0 {
        return last(leaf, y);
    }

    loop {
        let y = leaf[x].parent;
        if !y == 0 {
            return !0;
        }
        if leaf[y].right == x {
            return y;
        }
        debug_assert_eq!(leaf[y].left, x);
        x = y;
    }
}

// Get the logical successor to a leaf
fn next(leaf: &[Leaf], mut x: usize) -> usize {
    let y = leaf[x].right;
    if !y != 0 {
        return first(leaf, y);
    }

    loop {
        let y = leaf[x].parent;
        if !y == 0 {
            return !0;
        }
        if leaf[y].left == x {
            return y;
        }
        debug_assert_eq!(leaf[y].right, x);
        x = y;
    }
}

//-----------------------------------------------------------------------------------------------//

// DEBUG : Check the tree structure
#[cfg(any(test, debug_assertions))]
fn check_tree(leaf: &[Leaf], root: usize) {
    // Check we are starting at the root
    debug_assert!(!root == 0 || leaf[root].parent == !0);

    // Iterate over leaves and check each one
    let mut x = first(leaf, root);

    while !x != 0 {
        let y = leaf[x].left;
        let z = leaf[x].right;

        if !y != 0 {
            debug_assert_eq!(x, leaf[y].parent);
        }

        if !z != 0 {
            debug_assert_eq!(x, leaf[z].parent);
        }

        x = next(leaf, x);
    }
}

// DEBUG : Check the leaf counts
#[cfg(any(test, debug_assertions))]
fn check_count(leaf: &[Leaf], root: usize) -> usize {
    // Count leaves (forwards)
    let mut x = first(leaf, root);
    let mut count_f = 0;

    while !x != 0 {
        count_f += 1;
        x = next(leaf, x);
    }

    // Count leaves (backwards)
    x = last(leaf, root);
    let mut count_b = 0;

    while !x != 0 {
        count_b += 1;
        x = prev(leaf, x);
    }

    debug_assert_eq!(count_f, count_b);

    // Return the count
    count_f
}

// DEBUG : Check the cached heights
#[cfg(any(test, debug_assertions))]
fn check_heights(leaf: &[Leaf], root: usize) -> i32 {
    if !root == 0 {
        return -1;
    }

    let l = check_heights(leaf, leaf[root].left);
    let r = check_heights(leaf, leaf[root].right);
    debug_assert_eq!(leaf[root].height, 1 + l.max(r));
    1 + l.max(r)
}

// TEST : Check the height balance at every leaf
#[cfg(test)]
fn check_balanced(leaf: &[Leaf], root: usize) -> i32 {
    if !root == 0 {
        return -1;
    }

    let l = check_balanced(leaf, leaf[root].left);
    let r = check_balanced(leaf, leaf[root].right);
    assert!((l - r).abs() <= 1, "leaf {root} is out of balance: {l} vs {r}");
    assert_eq!(leaf[root].height, 1 + l.max(r));
    1 + l.max(r)
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Rotations preserve the in-order sequence and refresh heights
fn test_tree_0() {
    // Build the chain 0 -> 1 -> 2 down the right hand side
    let mut tree = Tree::new();
    let a = tree.alloc();
    let b = tree.alloc();
    let c = tree.alloc();

    tree.set_root(a);
    tree.set_right(a, b);
    tree.set_right(b, c);
    tree.update_height(c);
    tree.update_height(b);
    tree.update_height(a);

    assert_eq!(tree.height(a), 2);
    assert_eq!(tree.balance(a), -2);
    assert_eq!(tree.to_string(), "[ 0 1 2 ]");

    let root = tree.rotate_left(a);
    tree.set_root(root);
    tree.check();

    assert_eq!(tree.root(), b);
    assert_eq!(tree.left(b), a);
    assert_eq!(tree.right(b), c);
    assert_eq!(tree.height(b), 1);
    assert_eq!(tree.balance(b), 0);
    assert_eq!(tree.to_string(), "[ 0 1 2 ]");

    let root = tree.rotate_right(b);
    tree.set_root(root);
    tree.check();

    assert_eq!(tree.root(), a);
    assert_eq!(tree.height(a), 2);
    assert_eq!(tree.to_string(), "[ 0 1 2 ]");
}

#[test]
// Freeing a leaf moves the last leaf into its slot and keeps the links intact
fn test_tree_1() {
    let mut tree = Tree::new();
    let a = tree.alloc();
    let b = tree.alloc();
    let c = tree.alloc();

    // b is the root with a on the left and c on the right
    tree.set_root(b);
    tree.set_left(b, a);
    tree.set_right(b, c);
    tree.update_height(b);

    // Detach a, then free it: c moves into slot 0
    tree.set_left(b, !0);
    tree.update_height(b);
    tree.free(a);
    tree.check();

    assert_eq!(tree.count(), 2);
    assert_eq!(tree.root(), b);
    assert_eq!(tree.right(b), 0);
    assert_eq!(tree.parent(0), b);
    assert_eq!(tree.to_string(), "[ 1 0 ]");

    // Detach and free the root, which is the last slot so nothing moves
    let child = tree.right(b);
    tree.set_root(child);
    tree.free(b);
    tree.check();

    assert_eq!(tree.count(), 1);
    assert_eq!(tree.root(), 0);
    assert_eq!(tree.first(tree.root()), 0);
}

//! ## Introduction
//!
//! This crate implements a small family of keyed collections that report the work each lookup
//! does. Every search returns, alongside its result, the number of key comparisons it made and the
//! time it took, so the containers can be compared against one another on the same data.
//!
//! ## Benefits
//!
//! - Lookup statistics are returned by value with each result. The containers hold no hidden
//!   metric state, so a shared reference is all a search needs.
//! - The trees do not need hashable keys. Keys are ordered by `Ord`, or by any comparator
//!   function supplied at construction.
//! - A tree can be re-keyed: a new index over the same values is built from an existing tree, a
//!   key extractor and a comparator.
//! - Tree nodes live in a single array and are linked by index. Rotations and deletions move
//!   indices around rather than keys and values.
//! - Failed operations leave a container exactly as it was.
//!
//! ## Contents
//!
//! <center>
//!
//! | Type          | Structure                 | Orders By         | Lookup cost      |
//! |:--------------|:--------------------------|:------------------|------------------|
//! | `Sequence`    | Singly linked list        | Insertion         | O(n)             |
//! | `OrderedMap`  | Binary search tree        | Comparator        | O(height)        |
//! | `BalancedMap` | Height balanced tree      | Comparator        | O(log n)         |
//! | `HashTable`   | Buckets of `Sequence`s    | Hash              | O(1 + load)      |
//!
//! </center>
//!
//! `OrderedMap`, `BalancedMap` and `HashTable` all implement `Dictionary`, so record indexing code
//! can be written once for any of them.
//!
//! The crate exposes an additional type `util::Tree` that provides the foundation of the trees.
//! It manages the shape of a binary tree over `usize` indices into an external vector of data,
//! without storing the vector itself.
//!
//! ## Logging
//!
//! Construction and restructuring emit `tracing` events at `debug` and `trace` level. No
//! subscriber is installed by the crate.

#![warn(missing_docs)]

mod balanced;
mod compare;
mod dictionary;
mod error;
mod hash;
mod sequence;
mod stats;
mod tree;
pub mod util;

pub use balanced::*;
pub use compare::*;
pub use dictionary::*;
pub use error::*;
pub use hash::*;
pub use sequence::*;
pub use stats::*;
pub use tree::*;

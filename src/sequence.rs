//! A singly linked list that keeps its cells in a vector
//!
//! Cells are addressed by their position in the vector and removed cells are recycled by later
//! insertions. Cell 0 is a permanent, empty head cell, so insertion and removal never special
//! case the front of the list, and the last cell is tracked for constant time appends.

use core::fmt::{Debug, Display};
use core::iter::FusedIterator;

use crate::{
    error::{Error, Result},
    stats::{Lookup, Meter, Probe},
};

// The head cell
const HEAD: usize = 0;

//-----------------------------------------------------------------------------------------------//

// A cell in the list; only the head has no value
#[derive(Clone)]
struct Cell<T> {
    value: Option<T>,
    next: usize,
}

//-----------------------------------------------------------------------------------------------//

/// An ordered sequence of values with positional insertion and removal and instrumented search.
///
/// `Sequence` is also the bucket type of `HashTable`, where its equality based `search` and
/// `remove_equal` find entries by key.
#[derive(Clone)]
pub struct Sequence<T> {
    cell: Vec<Cell<T>>,
    free: Vec<usize>,
    tail: usize,
    len: usize,
}

impl<T> Sequence<T> {
    /// Constructor
    pub fn new() -> Sequence<T> {
        Self::with_capacity(0)
    }

    /// Constructor, pre-allocating room for `capacity` values
    pub fn with_capacity(capacity: usize) -> Sequence<T> {
        let mut cell = Vec::with_capacity(capacity + 1);
        cell.push(Cell {
            value: None,
            next: !0,
        });

        Sequence {
            cell,
            free: Vec::new(),
            tail: HEAD,
            len: 0,
        }
    }

    /// Get the number of values in the sequence
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if there are any values in the sequence
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tail == HEAD
    }

    /// Insert a value so that it ends up at `position`.
    ///
    /// `position` may be anything from 0 (the front) to `len()` (the back); anything else fails
    /// with `Error::OutOfRange`. Costs O(position).
    pub fn insert_at(&mut self, value: T, position: usize) -> Result<()> {
        if position > self.len {
            return Err(Error::OutOfRange {
                position,
                len: self.len,
            });
        }

        let prev = self.nth_prev(position);
        self.link_after(prev, value);
        Ok(())
    }

    /// Add a value to the back of the sequence
    pub fn append(&mut self, value: T) {
        self.link_after(self.tail, value);
    }

    /// Remove and return the value at `position`.
    ///
    /// Fails with `Error::EmptyCollection` if the sequence is empty, or `Error::OutOfRange` unless
    /// `position < len()`.
    pub fn remove_at(&mut self, position: usize) -> Result<T> {
        if self.is_empty() {
            return Err(Error::EmptyCollection);
        }

        if position >= self.len {
            return Err(Error::OutOfRange {
                position,
                len: self.len,
            });
        }

        let prev = self.nth_prev(position);
        self.unlink_after(prev).ok_or(Error::NotFound)
    }

    /// Remove and return the first value equal to `probe`.
    ///
    /// Fails with `Error::EmptyCollection` if the sequence is empty, or `Error::NotFound` if no
    /// value matches.
    pub fn remove_equal<Q>(&mut self, probe: &Q) -> Result<T>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        if self.is_empty() {
            return Err(Error::EmptyCollection);
        }

        let mut prev = HEAD;
        loop {
            let x = self.cell[prev].next;
            if !x == 0 {
                return Err(Error::NotFound);
            }
            if matches!(&self.cell[x].value, Some(value) if value == probe) {
                return self.unlink_after(prev).ok_or(Error::NotFound);
            }
            prev = x;
        }
    }

    /// Look for the first value equal to `probe`, reporting the work done whether or not it is
    /// found. One comparison is counted for every cell visited.
    pub fn probe<Q>(&self, probe: &Q) -> Probe<&T>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        let mut meter = Meter::start();

        for value in self.iter() {
            meter.tick();
            if value == probe {
                return meter.finish(Some(value));
            }
        }

        meter.finish(None)
    }

    /// Get the first value equal to `probe`, with the work done finding it.
    ///
    /// Fails with `Error::NotFound` if no value matches.
    pub fn search<Q>(&self, probe: &Q) -> Result<Lookup<&T>>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        self.probe(probe).found()
    }

    /// Get a mutable reference to the first value equal to `probe`
    pub fn find_mut<Q>(&mut self, probe: &Q) -> Result<&mut T>
    where
        T: PartialEq<Q>,
        Q: ?Sized,
    {
        let mut x = self.cell[HEAD].next;
        while !x != 0 {
            if matches!(&self.cell[x].value, Some(value) if value == probe) {
                return self.cell[x].value.as_mut().ok_or(Error::NotFound);
            }
            x = self.cell[x].next;
        }
        Err(Error::NotFound)
    }

    /// Get a mutable reference to the last value
    pub fn last_mut(&mut self) -> Option<&mut T> {
        // The head holds no value, so this is `None` when empty
        self.cell[self.tail].value.as_mut()
    }

    /// Count the values that satisfy a predicate
    pub fn count_matching<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        self.iter().filter(|value| predicate(value)).count()
    }

    /// Sum a numeric projection of every value.
    ///
    /// Fails with `Error::EmptyCollection` if the sequence is empty.
    pub fn sum_by<F>(&self, extract: F) -> Result<f64>
    where
        F: FnMut(&T) -> f64,
    {
        if self.is_empty() {
            return Err(Error::EmptyCollection);
        }
        Ok(self.iter().map(extract).sum())
    }

    /// List the values one per line, or a placeholder if the sequence is empty
    pub fn to_text(&self) -> String
    where
        T: Display,
    {
        if self.is_empty() {
            return String::from("The list is empty!\n");
        }
        self.to_string()
    }

    /// Iterate over the values from front to back
    pub fn iter(&self) -> SequenceIterator<'_, T> {
        SequenceIterator {
            sequence: self,
            cell: self.cell[HEAD].next,
            count: self.len,
        }
    }

    // Get the cell before `position`, which is the head for position 0
    fn nth_prev(&self, position: usize) -> usize {
        let mut prev = HEAD;
        for _ in 0..position {
            prev = self.cell[prev].next;
        }
        prev
    }

    // Link a new cell after `prev`
    fn link_after(&mut self, prev: usize, value: T) {
        let next = self.cell[prev].next;
        let cell = Cell {
            value: Some(value),
            next,
        };

        let x = match self.free.pop() {
            Some(x) => {
                self.cell[x] = cell;
                x
            }
            None => {
                self.cell.push(cell);
                self.cell.len() - 1
            }
        };

        self.cell[prev].next = x;
        if prev == self.tail {
            self.tail = x;
        }
        self.len += 1;
    }

    // Unlink the cell after `prev` and return its value
    fn unlink_after(&mut self, prev: usize) -> Option<T> {
        let x = self.cell[prev].next;
        debug_assert!(!x != 0);

        self.cell[prev].next = self.cell[x].next;
        self.cell[x].next = !0;
        if x == self.tail {
            self.tail = prev;
        }

        self.len -= 1;
        self.free.push(x);
        self.cell[x].value.take()
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Display for Sequence<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for value in self.iter() {
            writeln!(f, "{value}")?;
        }
        Ok(())
    }
}

impl<T> Debug for Sequence<T>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> PartialEq for Sequence<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut sequence = Self::with_capacity(iter.size_hint().0);
        sequence.extend(iter);
        sequence
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = SequenceIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//-----------------------------------------------------------------------------------------------//

/// Iterator over a `Sequence`
pub struct SequenceIterator<'a, T> {
    sequence: &'a Sequence<T>,
    cell: usize,
    count: usize,
}

impl<'a, T> Iterator for SequenceIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if !self.cell == 0 {
            return None;
        }

        let cell = &self.sequence.cell[self.cell];
        self.cell = cell.next;
        self.count -= 1;

        cell.value.as_ref()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.count, Some(self.count))
    }
}

impl<T> FusedIterator for SequenceIterator<'_, T> {}

//-----------------------------------------------------------------------------------------------//

#[test]
// Positional insertion, including the front and the back
fn test_sequence_0() {
    let mut sequence = Sequence::new();
    assert!(sequence.is_empty());

    sequence.insert_at("b", 0).unwrap();
    sequence.insert_at("d", 1).unwrap();
    sequence.insert_at("a", 0).unwrap();
    sequence.insert_at("c", 2).unwrap();
    sequence.append("e");

    let v: Vec<&str> = sequence.iter().copied().collect();
    assert_eq!(v, vec!["a", "b", "c", "d", "e"]);
    assert_eq!(sequence.len(), 5);

    assert_eq!(
        sequence.insert_at("z", 7),
        Err(Error::OutOfRange {
            position: 7,
            len: 5
        })
    );
    assert_eq!(sequence.len(), 5);
}

#[test]
// Positional removal keeps the tail in step
fn test_sequence_1() {
    let mut sequence: Sequence<i32> = (1..=4).collect();

    assert_eq!(sequence.remove_at(3), Ok(4));
    sequence.append(5);
    assert_eq!(sequence.remove_at(0), Ok(1));
    assert_eq!(
        sequence.remove_at(3),
        Err(Error::OutOfRange {
            position: 3,
            len: 3
        })
    );

    let v: Vec<i32> = sequence.iter().copied().collect();
    assert_eq!(v, vec![2, 3, 5]);

    for _ in 0..3 {
        sequence.remove_at(0).unwrap();
    }
    assert!(sequence.is_empty());
    assert_eq!(sequence.remove_at(0), Err(Error::EmptyCollection));

    // The recycled cells are reused and the tail is back at the head
    sequence.append(6);
    sequence.append(7);
    let v: Vec<i32> = sequence.iter().copied().collect();
    assert_eq!(v, vec![6, 7]);
}

#[test]
// Removal by equality takes the first match only
fn test_sequence_2() {
    let mut sequence: Sequence<i32> = [1, 2, 3, 2].into_iter().collect();

    assert_eq!(sequence.remove_equal(&2), Ok(2));
    assert_eq!(sequence.remove_equal(&9), Err(Error::NotFound));
    assert_eq!(sequence.to_text(), "1\n3\n2\n");

    assert_eq!(sequence.remove_equal(&2), Ok(2));
    sequence.append(4);
    assert_eq!(sequence.to_text(), "1\n3\n4\n");

    let mut empty: Sequence<i32> = Sequence::new();
    assert_eq!(empty.remove_equal(&1), Err(Error::EmptyCollection));
    assert_eq!(empty.to_text(), "The list is empty!\n");
}

#[test]
// Searching counts a comparison per cell visited
fn test_sequence_3() {
    let sequence: Sequence<&str> = ["x", "y", "z"].into_iter().collect();

    let lookup = sequence.search(&"z").unwrap();
    assert_eq!(**lookup, "z");
    assert_eq!(lookup.comparisons(), 3);

    assert_eq!(sequence.search(&"x").unwrap().comparisons(), 1);

    let probe = sequence.probe(&"w");
    assert!(!probe.is_hit());
    assert_eq!(probe.stats.comparisons, 3);
    assert_eq!(sequence.search(&"w").unwrap_err(), Error::NotFound);
}

#[test]
// Counting and summing
fn test_sequence_4() {
    let sequence: Sequence<(u32, f64)> = [(1, 2.5), (2, 4.0), (3, 1.5)].into_iter().collect();

    assert_eq!(sequence.count_matching(|(id, _)| id % 2 == 1), 2);
    assert_eq!(sequence.count_matching(|_| false), 0);
    assert_eq!(sequence.sum_by(|(_, price)| *price), Ok(8.0));

    let empty: Sequence<(u32, f64)> = Sequence::new();
    assert_eq!(empty.sum_by(|(_, price)| *price), Err(Error::EmptyCollection));
    assert_eq!(empty.count_matching(|_| true), 0);
}

#[test]
// Values can be changed in place
fn test_sequence_5() {
    let mut sequence: Sequence<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    sequence.remove_at(0).unwrap();
    sequence.append("c".to_string());

    sequence.find_mut("c").unwrap().push('!');
    sequence.find_mut("b").unwrap().make_ascii_uppercase();

    assert_eq!(sequence.to_text(), "B\nc!\n");
    assert_eq!(sequence.find_mut("a").unwrap_err(), Error::NotFound);
}

#[test]
// A stress test with random insertion and removal against a vector
fn test_sequence_6() {
    use rand::prelude::*;

    const COUNT: usize = 5000;

    let mut rng = SmallRng::seed_from_u64(1234567890);

    let mut sequence = Sequence::new();
    let mut expected = Vec::new();

    for i in 0..COUNT {
        if expected.is_empty() || rng.random_bool(0.6) {
            let position = rng.random_range(0..=expected.len());
            sequence.insert_at(i, position).unwrap();
            expected.insert(position, i);
        } else {
            let position = rng.random_range(0..expected.len());
            assert_eq!(sequence.remove_at(position), Ok(expected.remove(position)));
        }
        assert_eq!(sequence.len(), expected.len());
    }

    let v: Vec<usize> = sequence.iter().copied().collect();
    assert_eq!(v, expected);
}

//! Per lookup performance figures
//!
//! Lookups report how much work they did by value, next to the result, instead of leaving the
//! figures behind on the collection.

use core::{ops::Deref, time::Duration};
use std::time::Instant;

use crate::error::{Error, Result};

//-----------------------------------------------------------------------------------------------//

/// Work done by a single lookup
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Number of key comparisons made
    pub comparisons: u64,
    /// Wall time taken by the whole lookup
    pub elapsed: Duration,
}

impl SearchStats {
    /// Elapsed time in (fractional) milliseconds
    #[inline]
    pub fn elapsed_millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1_000.0
    }
}

//-----------------------------------------------------------------------------------------------//

/// Outcome of a lookup that may have missed.
///
/// The statistics are available either way, which is what a report needs when a lookup fails.
#[derive(Debug)]
pub struct Probe<T> {
    /// The item found, if any
    pub value: Option<T>,
    /// The work done looking for it
    pub stats: SearchStats,
}

impl<T> Probe<T> {
    /// Convert into a `Lookup`, failing with `Error::NotFound` on a miss
    pub fn found(self) -> Result<Lookup<T>> {
        match self.value {
            Some(value) => Ok(Lookup {
                value,
                stats: self.stats,
            }),
            None => Err(Error::NotFound),
        }
    }

    /// Was the item found
    #[inline]
    pub fn is_hit(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn map<U, F>(self, f: F) -> Probe<U>
    where
        F: FnOnce(T) -> U,
    {
        Probe {
            value: self.value.map(f),
            stats: self.stats,
        }
    }
}

//-----------------------------------------------------------------------------------------------//

/// A successful lookup, together with the work it took.
///
/// `Lookup` dereferences to the item found.
#[derive(Debug)]
pub struct Lookup<T> {
    value: T,
    stats: SearchStats,
}

impl<T> Lookup<T> {
    /// The item found
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the item found, discarding the statistics
    #[inline]
    pub fn into_value(self) -> T {
        self.value
    }

    /// The work done finding the item
    #[inline]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Number of comparisons made
    #[inline]
    pub fn comparisons(&self) -> u64 {
        self.stats.comparisons
    }

    /// Elapsed time in (fractional) milliseconds
    #[inline]
    pub fn elapsed_millis(&self) -> f64 {
        self.stats.elapsed_millis()
    }
}

impl<T> Deref for Lookup<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

//-----------------------------------------------------------------------------------------------//

// Counts comparisons and times a lookup from construction until `finish`
pub(crate) struct Meter {
    start: Instant,
    comparisons: u64,
}

impl Meter {
    pub(crate) fn start() -> Meter {
        Meter {
            start: Instant::now(),
            comparisons: 0,
        }
    }

    #[inline]
    pub(crate) fn tick(&mut self) {
        self.comparisons += 1;
    }

    #[inline]
    pub(crate) fn add(&mut self, comparisons: u64) {
        self.comparisons += comparisons;
    }

    pub(crate) fn finish<T>(self, value: Option<T>) -> Probe<T> {
        Probe {
            value,
            stats: SearchStats {
                comparisons: self.comparisons,
                elapsed: self.start.elapsed(),
            },
        }
    }
}

//-----------------------------------------------------------------------------------------------//

#[test]
// A miss keeps its statistics but converts to `NotFound`
fn test_stats_0() {
    let mut meter = Meter::start();
    meter.tick();
    meter.add(2);

    let probe: Probe<&i32> = meter.finish(None);
    assert_eq!(probe.stats.comparisons, 3);
    assert!(!probe.is_hit());
    assert_eq!(probe.found().unwrap_err(), Error::NotFound);
}

#[test]
// A hit dereferences to the value
fn test_stats_1() {
    let value = 42;
    let lookup = Meter::start().finish(Some(&value)).found().unwrap();

    assert_eq!(**lookup, 42);
    assert_eq!(lookup.comparisons(), 0);
    assert!(lookup.elapsed_millis() >= 0.0);
}

#[test]
// Milliseconds are fractional
fn test_stats_2() {
    let stats = SearchStats {
        comparisons: 0,
        elapsed: Duration::from_micros(1500),
    };

    assert!((stats.elapsed_millis() - 1.5).abs() < 1e-9);
}

//! Key comparators for the ordered collections

use core::cmp::Ordering;

/// Orders keys for an ordered collection.
///
/// Any `Fn(&K, &K) -> Ordering` is a comparator, so closures and function items such as
/// `str::cmp` can be passed directly.
pub trait Compare<K: ?Sized> {
    /// Compare two keys
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// The natural ordering of keys that implement `Ord`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Compare<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K: ?Sized, F> Compare<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Compare strings ignoring ASCII case
pub fn ignore_ascii_case<S: AsRef<str> + ?Sized>(a: &S, b: &S) -> Ordering {
    let a = a.as_ref().bytes().map(|c| c.to_ascii_lowercase());
    let b = b.as_ref().bytes().map(|c| c.to_ascii_lowercase());
    a.cmp(b)
}

//-----------------------------------------------------------------------------------------------//

#[test]
// Natural ordering and closures agree
fn test_compare_0() {
    let reverse = |a: &i32, b: &i32| b.cmp(a);

    assert_eq!(Natural.compare(&1, &2), Ordering::Less);
    assert_eq!(reverse.compare(&1, &2), Ordering::Greater);
    assert_eq!(Compare::<str>::compare(&Natural, "b", "a"), Ordering::Greater);
}

#[test]
// Case is ignored only for ASCII letters
fn test_compare_1() {
    assert_eq!(ignore_ascii_case("Widget", "wIDGET"), Ordering::Equal);
    assert_eq!(ignore_ascii_case("apple", "Banana"), Ordering::Less);
    assert_eq!(ignore_ascii_case("b", "A"), Ordering::Greater);
}

//! Errors reported by the collections

use thiserror::Error;

/// Error returned by any fallible collection operation.
///
/// Every failure is reported to the immediate caller and leaves the collection exactly as it was
/// before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The key or value is not in the collection
    #[error("item not found")]
    NotFound,

    /// A key comparing equal to the new key is already in the collection
    #[error("an item with the same key was already inserted")]
    DuplicateKey,

    /// A position based operation was given a position outside the sequence
    #[error("position {position} is out of range for a sequence of length {len}")]
    OutOfRange {
        /// The rejected position
        position: usize,
        /// The length of the sequence at the time of the call
        len: usize,
    },

    /// The operation requires at least one element in a sequence
    #[error("the sequence is empty")]
    EmptyCollection,

    /// The operation requires at least one node in a tree
    #[error("the tree is empty")]
    EmptyState,

    /// A construction parameter was rejected
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

/// Result type used throughout the crate
pub type Result<T> = core::result::Result<T, Error>;

//-----------------------------------------------------------------------------------------------//

#[test]
// Messages carry the offending position
fn test_error_0() {
    let error = Error::OutOfRange {
        position: 7,
        len: 3,
    };

    assert_eq!(
        error.to_string(),
        "position 7 is out of range for a sequence of length 3"
    );
    assert_eq!(
        Error::InvalidArgument("capacity must be at least 1").to_string(),
        "invalid argument: capacity must be at least 1"
    );
}

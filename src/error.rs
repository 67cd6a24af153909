//! Error type shared by every fallible operation in the crate.
use std::ops::Range;
use thiserror::Error;

/// Errors reported by `BitArray` and its range views.  All of them describe a programming error
/// on the caller's side; none of them leave the array partially modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A bit index (or word index, for the word accessors) past the end of the array.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A whole-array operation between arrays of different bit counts.
    #[error("size mismatch: expected {expected} bits, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A range which does not fit inside the array it is supposed to view.
    #[error("range of {len} bits starting at {start} is out of bounds for {size} bits")]
    RangeOutOfBounds {
        start: usize,
        len: usize,
        size: usize,
    },

    /// Two ranges of the same array which share bits, rejected because the array's config asks
    /// for overlap checking.
    #[error("ranges {a:?} and {b:?} overlap")]
    Overlap { a: Range<usize>, b: Range<usize> },

    /// A character other than `'0'` or `'1'` in a bit string.
    #[error("invalid digit {found:?} at position {position}")]
    InvalidDigit { position: usize, found: char },
}

pub type Result<T> = std::result::Result<T, Error>;

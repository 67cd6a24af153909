//! A fixed-size array of bits packed into `u64` words, with O(1) access to single bits and bulk
//! copy/swap of arbitrary spans between two arrays or within one.
//!
//! ```
//! use bitarray::{copy_range, swap_range, BitArray};
//!
//! let src: BitArray = "011100000".parse().unwrap();
//! let mut dst: BitArray = "101000110".parse().unwrap();
//!
//! copy_range(&mut dst.range_mut(0, 5).unwrap(), &src.range(0, 5).unwrap());
//! assert_eq!("011100110", dst.to_string());
//!
//! let mut a: BitArray = "100110011".parse().unwrap();
//! let mut b: BitArray = "000001110".parse().unwrap();
//!
//! //only min(4, 5) bits are exchanged
//! swap_range(&mut a.range_mut(2, 4).unwrap(), &mut b.range_mut(3, 5).unwrap());
//! assert_eq!("100011011", a.to_string());
//! assert_eq!("000011010", b.to_string());
//! ```
//!
//! Bulk operations pick the cheapest of three paths based on where the two spans start inside
//! their words: whole-word moves when both start on a word boundary, a single partial word and
//! then whole words when both start at the same offset, and a bit-by-bit walk otherwise.
#[macro_use]
extern crate slog;

#[macro_use]
mod bitfiddling;

mod bitarray;
mod config;
mod engine;
mod error;
mod range;

pub use crate::bitarray::{BitArray, SingleBitArray};
pub use crate::bitfiddling::BitFiddling;
pub use crate::config::{Config, OverlapPolicy, BITS_PER_WORD};
pub use crate::error::{Error, Result};
pub use crate::range::{copy_range, swap_range, BitRange, BitRangeMut};

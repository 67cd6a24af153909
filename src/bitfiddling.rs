//! Contains the word-level bit fiddling routines the bit array and the range engine are built on.
//! Everything here operates on a single `u64` word; nothing here knows about bit indices that
//! span words.

/// Internal macro which generates a compile-time expression that evaluates to a u64 bitmask with
/// the lower `n` bits set to 1, where `n` is the parameter to the macro
///
/// # Examples
///
/// ```
/// # #[macro_use] extern crate bitarray;
/// # fn main() {
///
/// assert_eq!(0, bitmask!(0));
/// assert_eq!(0xffff_ffff_ffff_ffff_u64, bitmask!(64));
/// assert_eq!(0xffff_ffff_u64, bitmask!(32));
/// assert_eq!(0b011111, bitmask!(5));
/// # }
/// ```
#[macro_export]
macro_rules! bitmask {
    ($bits:expr) => {{
        assert!($bits <= 64);

        if $bits == 64 {
            0xffff_ffff_ffff_ffff_u64
        } else {
            1_u64.wrapping_shl(($bits) as u32) - 1_u64
        }
    }};
}

/// A trait which brings in various bit-fiddling methods intended to be used with unsigned integer
/// types.
pub trait BitFiddling {
    /// Given a 64-bit integer, returns the number of bits set to 1
    fn popcnt(self) -> usize;

    /// Counts the set bits among the lowest `n` bits only.  Unlike `popcnt_first_n` style
    /// helpers, `n` is a count and not an inclusive bit position, so `popcnt_low(0)` is always 0.
    fn popcnt_low(self, n: usize) -> usize;

    /// Merges two words under a mask: bits selected by `mask` come from `other`, all the others
    /// are kept from `self`.
    fn blend(self, other: Self, mask: Self) -> Self;
}

impl BitFiddling for u64 {
    #[inline]
    fn popcnt(self) -> usize {
        self.count_ones() as usize
    }

    #[inline]
    fn popcnt_low(self, n: usize) -> usize {
        (self & bitmask!(n)).popcnt()
    }

    #[inline]
    fn blend(self, other: u64, mask: u64) -> u64 {
        (self & !mask) | (other & mask)
    }
}

//! Describes the `SingleBitArray` trait implemented on `u64`, and `BitArray`, a fixed-size array
//! of bits packed into `u64` words.
use crate::bitfiddling::BitFiddling;
use crate::config::{Config, OverlapPolicy, BITS_PER_WORD};
use crate::engine::{self, CopyWithin, SwapWithin};
use crate::error::{Error, Result};
use crate::range::{self, BitRange, BitRangeMut};
use num::Integer;
use std::cmp;
use std::fmt;
use std::ops;
use std::str::FromStr;

/// A `u64` viewed as an array of 64 single bits, bit 0 being the least significant.  These are
/// unchecked; callers guarantee `index < 64`.
pub trait SingleBitArray {
    fn get_bit(self, index: usize) -> bool;

    fn set_bit(&mut self, index: usize, val: bool);

    fn toggle_bit(&mut self, index: usize);
}

impl SingleBitArray for u64 {
    #[inline]
    fn get_bit(self, index: usize) -> bool {
        self & (1u64 << index) != 0
    }

    #[inline]
    fn set_bit(&mut self, index: usize, val: bool) {
        let mask = 1u64 << index;
        let bitvalue = if val { mask } else { 0u64 };

        *self = (*self & !mask) | bitvalue;
    }

    #[inline]
    fn toggle_bit(&mut self, index: usize) {
        *self ^= 1u64 << index;
    }
}

/// A fixed number of bits, stored `BITS_PER_WORD` to a word.
///
/// Bit `k` is bit `k % 64` of word `k / 64`.  The number of bits is set at construction and never
/// changes.  Bits of the last word beyond the array's length carry no meaning: `set_all` may set
/// them, but nothing ever reads them back.
#[derive(Clone)]
pub struct BitArray {
    bits: Vec<u64>,
    len: usize,
    config: Config,
}

impl BitArray {
    /// Creates an array of `len` bits, all 0.
    pub fn new(len: usize) -> BitArray {
        BitArray::with_config(len, Config::default())
    }

    pub fn with_config(len: usize, config: Config) -> BitArray {
        debug!(config.logger, "new bit array"; "len" => len, "words" => Self::words_for(len));

        BitArray {
            bits: vec![0u64; Self::words_for(len)],
            len,
            config,
        }
    }

    /// Creates a 64-bit array whose bit `i` is bit `i` of `val`.
    pub fn from_u64(val: u64) -> BitArray {
        BitArray {
            bits: vec![val],
            len: BITS_PER_WORD,
            config: Config::default(),
        }
    }

    /// Wraps existing words as an array of `len` bits.  `words` must hold exactly as many words as
    /// `len` bits need.
    pub fn from_words(words: Vec<u64>, len: usize) -> Result<BitArray> {
        let expected = Self::words_for(len);
        if words.len() != expected {
            return Err(Error::SizeMismatch {
                expected,
                actual: words.len(),
            });
        }

        Ok(BitArray {
            bits: words,
            len,
            config: Config::default(),
        })
    }

    #[inline]
    fn words_for(len: usize) -> usize {
        let (words, rest) = len.div_rem(&BITS_PER_WORD);
        words + (rest != 0) as usize
    }

    /// The number of bits in the array
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn word_count(&self) -> usize {
        self.bits.len()
    }

    /// The backing words.  Bits of the last word past `len()` are unspecified.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.bits
    }

    #[inline]
    pub(crate) fn words_mut(&mut self) -> &mut [u64] {
        &mut self.bits
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub(crate) fn logger(&self) -> &slog::Logger {
        &self.config.logger
    }

    /// Checks `k` and splits it into `(word index, bit offset)`.
    #[inline]
    fn locate(&self, k: usize) -> Result<(usize, usize)> {
        if k >= self.len {
            return Err(Error::IndexOutOfRange {
                index: k,
                len: self.len,
            });
        }

        Ok(k.div_rem(&BITS_PER_WORD))
    }

    /// Checks that `len` bits starting at `start` fit in the array.
    pub(crate) fn check_span(&self, start: usize, len: usize) -> Result<()> {
        match start.checked_add(len) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(Error::RangeOutOfBounds {
                start,
                len,
                size: self.len,
            }),
        }
    }

    #[inline]
    pub fn get(&self, k: usize) -> Result<bool> {
        let (word, offset) = self.locate(k)?;
        Ok(self.bits[word].get_bit(offset))
    }

    /// Reads bit `k` with no bounds check beyond the slice's own.
    #[inline]
    pub(crate) fn bit(&self, k: usize) -> bool {
        let (word, offset) = k.div_rem(&BITS_PER_WORD);
        self.bits[word].get_bit(offset)
    }

    #[inline]
    pub fn set(&mut self, k: usize) -> Result<()> {
        self.put(k, true)
    }

    #[inline]
    pub fn clear(&mut self, k: usize) -> Result<()> {
        self.put(k, false)
    }

    #[inline]
    pub fn put(&mut self, k: usize, val: bool) -> Result<()> {
        let (word, offset) = self.locate(k)?;
        self.bits[word].set_bit(offset, val);
        Ok(())
    }

    #[inline]
    pub fn toggle(&mut self, k: usize) -> Result<()> {
        let (word, offset) = self.locate(k)?;
        self.bits[word].toggle_bit(offset);
        Ok(())
    }

    /// Sets bit `k` to `val`, returning the value it held before.
    #[inline]
    pub fn replace(&mut self, k: usize, val: bool) -> Result<bool> {
        let (word, offset) = self.locate(k)?;
        let old = self.bits[word].get_bit(offset);
        self.bits[word].set_bit(offset, val);
        Ok(old)
    }

    /// Sets bit `k`, returning whether it was already set.
    #[inline]
    pub fn check_set(&mut self, k: usize) -> Result<bool> {
        self.replace(k, true)
    }

    /// Clears bit `k`, returning whether it was set.
    #[inline]
    pub fn check_clear(&mut self, k: usize) -> Result<bool> {
        self.replace(k, false)
    }

    pub fn get_word(&self, i: usize) -> Result<u64> {
        self.bits
            .get(i)
            .cloned()
            .ok_or(Error::IndexOutOfRange {
                index: i,
                len: self.bits.len(),
            })
    }

    pub fn set_word(&mut self, i: usize, val: u64) -> Result<()> {
        let len = self.bits.len();
        match self.bits.get_mut(i) {
            Some(word) => {
                *word = val;
                Ok(())
            }
            None => Err(Error::IndexOutOfRange { index: i, len }),
        }
    }

    pub fn set_all(&mut self) {
        for word in self.bits.iter_mut() {
            *word = !0u64;
        }
    }

    pub fn clear_all(&mut self) {
        for word in self.bits.iter_mut() {
            *word = 0;
        }
    }

    /// The number of set bits, ignoring whatever lies past the end in the last word.
    pub fn count_ones(&self) -> usize {
        self.count_ones_in(0, self.len)
    }

    /// Population count of `len` bits starting at `start`, a span already known to be in bounds.
    pub(crate) fn count_ones_in(&self, start: usize, len: usize) -> usize {
        if len == 0 {
            return 0;
        }

        let (first, first_offset) = start.div_rem(&BITS_PER_WORD);
        let (last, last_offset) = (start + len).div_rem(&BITS_PER_WORD);

        if first == last {
            return (self.bits[first] >> first_offset).popcnt_low(len);
        }

        //the shift leaves zeros above the span's part of the first word
        let mut count = (self.bits[first] >> first_offset).popcnt();
        count += self.bits[first + 1..last]
            .iter()
            .map(|word| word.popcnt())
            .sum::<usize>();

        if last_offset != 0 {
            count += self.bits[last].popcnt_low(last_offset);
        }

        count
    }

    /// A shared view over `len` bits starting at `start`.
    pub fn range(&self, start: usize, len: usize) -> Result<BitRange<'_>> {
        BitRange::new(self, start, len)
    }

    /// An exclusive view over `len` bits starting at `start`, which can be the destination of
    /// `copy_range` or either side of `swap_range`.
    pub fn range_mut(&mut self, start: usize, len: usize) -> Result<BitRangeMut<'_>> {
        BitRangeMut::new(self, start, len)
    }

    /// Overwrites this array with the contents of `src`, which must have the same length.
    pub fn copy_from(&mut self, src: &BitArray) -> Result<()> {
        if self.len != src.len {
            return Err(Error::SizeMismatch {
                expected: self.len,
                actual: src.len,
            });
        }

        self.bits.copy_from_slice(&src.bits);
        Ok(())
    }

    /// Swaps every bit from position `k` onwards with the bit at the same position of `other`, up
    /// to the end of the shorter array.  Returns the number of bits swapped.
    pub fn swap_from(&mut self, other: &mut BitArray, k: usize) -> Result<usize> {
        for len in &[self.len, other.len] {
            if k > *len {
                return Err(Error::IndexOutOfRange { index: k, len: *len });
            }
        }

        let (self_len, other_len) = (self.len - k, other.len - k);
        let mut a = self.range_mut(k, self_len)?;
        let mut b = other.range_mut(k, other_len)?;

        Ok(range::swap_range(&mut a, &mut b))
    }

    /// Copies `min(dst.len(), src.len())` bits from the `src` span into the `dst` span of this same
    /// array, returning that count.  The spans must not overlap; what happens when they do depends
    /// on the array's `OverlapPolicy`.
    pub fn copy_within(&mut self, dst: ops::Range<usize>, src: ops::Range<usize>) -> Result<usize> {
        let nb = self.prepare_within(&dst, &src)?;

        let mut op = CopyWithin {
            words: &mut self.bits,
        };
        let strategy = engine::transfer(&mut op, dst.start, src.start, nb);
        debug!(self.config.logger, "copy within";
               "strategy" => strategy.name(), "dst" => dst.start, "src" => src.start, "bits" => nb);

        Ok(nb)
    }

    /// Exchanges `min(a.len(), b.len())` bits between two spans of this same array, returning that
    /// count.  The overlap rules are the same as for `copy_within`.
    pub fn swap_within(&mut self, a: ops::Range<usize>, b: ops::Range<usize>) -> Result<usize> {
        let nb = self.prepare_within(&a, &b)?;

        let mut op = SwapWithin {
            words: &mut self.bits,
        };
        let strategy = engine::transfer(&mut op, a.start, b.start, nb);
        debug!(self.config.logger, "swap within";
               "strategy" => strategy.name(), "a" => a.start, "b" => b.start, "bits" => nb);

        Ok(nb)
    }

    /// Bounds-checks two spans of this array and applies the overlap policy to the `nb`-bit
    /// prefixes that will actually be touched.  Returns `nb`.
    fn prepare_within(&self, a: &ops::Range<usize>, b: &ops::Range<usize>) -> Result<usize> {
        let a_len = self.span_len(a)?;
        let b_len = self.span_len(b)?;
        let nb = cmp::min(a_len, b_len);

        let overlaps = nb != 0 && a.start < b.start + nb && b.start < a.start + nb;
        if overlaps && self.config.overlap == OverlapPolicy::Reject {
            warn!(self.config.logger, "rejected overlapping ranges";
                  "a" => a.start, "b" => b.start, "bits" => nb);
            return Err(Error::Overlap {
                a: a.start..a.start + nb,
                b: b.start..b.start + nb,
            });
        }

        debug_assert!(
            !overlaps,
            "overlapping ranges {:?} and {:?}",
            a.start..a.start + nb,
            b.start..b.start + nb
        );

        Ok(nb)
    }

    fn span_len(&self, span: &ops::Range<usize>) -> Result<usize> {
        if span.end < span.start {
            return Err(Error::RangeOutOfBounds {
                start: span.start,
                len: 0,
                size: self.len,
            });
        }

        let len = span.end - span.start;
        self.check_span(span.start, len)?;
        Ok(len)
    }

    /// Mask of the addressable bits in the last word; all ones when `len` is a whole number of
    /// words.
    #[inline]
    fn tail_mask(&self) -> u64 {
        match self.len % BITS_PER_WORD {
            0 => bitmask!(64),
            n => bitmask!(n),
        }
    }
}

impl PartialEq for BitArray {
    fn eq(&self, other: &BitArray) -> bool {
        if self.len != other.len {
            return false;
        }

        match self.bits.split_last() {
            None => true,
            Some((last, init)) => {
                let other_last = other.bits[init.len()];
                init == &other.bits[..init.len()] && (last ^ other_last) & self.tail_mask() == 0
            }
        }
    }
}

impl Eq for BitArray {}

impl FromStr for BitArray {
    type Err = Error;

    /// Parses a string of `'0'` and `'1'` characters, the first character being bit 0.
    fn from_str(s: &str) -> Result<BitArray> {
        let mut array = BitArray::new(s.chars().count());

        for (position, found) in s.chars().enumerate() {
            match found {
                '0' => {}
                '1' => array.set(position)?,
                _ => return Err(Error::InvalidDigit { position, found }),
            }
        }

        Ok(array)
    }
}

/// Renders one `'0'` or `'1'` per bit, bit 0 first.
impl fmt::Display for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        range::write_bits(f, (0..self.len).map(|k| self.bit(k)))
    }
}

impl fmt::Debug for BitArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitArray {{ len: {}, bits: {} }}", self.len, self)
    }
}

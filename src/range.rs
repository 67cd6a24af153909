//! Range views over a `BitArray` and the two bulk operations between them, `copy_range` and
//! `swap_range`.
//!
//! A view is just a borrowed array plus a start bit and a length; it never copies words.  Because
//! `BitRangeMut` holds an exclusive borrow, two views passed to `copy_range` or `swap_range`
//! always belong to different arrays and can never overlap.  Spans of the same array are moved
//! with `BitArray::copy_within` and `BitArray::swap_within` instead.
use crate::bitarray::BitArray;
use crate::engine::{self, CopyBetween, SwapBetween};
use crate::error::{Error, Result};
use std::cmp;
use std::fmt;

/// A shared view of `len` bits of a `BitArray`, starting at bit `start`.
#[derive(Clone, Copy)]
pub struct BitRange<'a> {
    array: &'a BitArray,
    start: usize,
    len: usize,
}

/// An exclusive view of `len` bits of a `BitArray`, starting at bit `start`.
pub struct BitRangeMut<'a> {
    array: &'a mut BitArray,
    start: usize,
    len: usize,
}

impl<'a> BitRange<'a> {
    pub(crate) fn new(array: &'a BitArray, start: usize, len: usize) -> Result<BitRange<'a>> {
        array.check_span(start, len)?;
        Ok(BitRange { array, start, len })
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bit `i` of the view, which is bit `start + i` of the array.
    pub fn get(&self, i: usize) -> Result<bool> {
        check_offset(i, self.len)?;
        Ok(self.array.bit(self.start + i))
    }

    pub fn count_ones(&self) -> usize {
        self.array.count_ones_in(self.start, self.len)
    }

    /// Copies the viewed bits out into a new array of `len()` bits.
    pub fn to_bit_array(&self) -> BitArray {
        let mut out = BitArray::with_config(self.len, self.array.config().clone());
        {
            let mut dst = BitRangeMut {
                array: &mut out,
                start: 0,
                len: self.len,
            };
            copy_range(&mut dst, self);
        }
        out
    }
}

impl<'a> BitRangeMut<'a> {
    pub(crate) fn new(
        array: &'a mut BitArray,
        start: usize,
        len: usize,
    ) -> Result<BitRangeMut<'a>> {
        array.check_span(start, len)?;
        Ok(BitRangeMut { array, start, len })
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reborrows this view as a shared one.
    pub fn as_range(&self) -> BitRange<'_> {
        BitRange {
            array: &*self.array,
            start: self.start,
            len: self.len,
        }
    }

    pub fn get(&self, i: usize) -> Result<bool> {
        self.as_range().get(i)
    }

    /// Writes bit `i` of the view, which is bit `start + i` of the array.
    pub fn put(&mut self, i: usize, val: bool) -> Result<()> {
        check_offset(i, self.len)?;
        self.array.put(self.start + i, val)
    }

    pub fn count_ones(&self) -> usize {
        self.as_range().count_ones()
    }

    pub fn to_bit_array(&self) -> BitArray {
        self.as_range().to_bit_array()
    }
}

#[inline]
fn check_offset(i: usize, len: usize) -> Result<()> {
    if i < len {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange { index: i, len })
    }
}

/// Copies the first `min(dst.len(), src.len())` bits of `src` into `dst`, leaving the rest of
/// `dst` alone.  Returns the number of bits copied.
pub fn copy_range(dst: &mut BitRangeMut, src: &BitRange) -> usize {
    let nb = cmp::min(dst.len, src.len);

    let strategy = engine::transfer(
        &mut CopyBetween {
            dst: dst.array.words_mut(),
            src: src.array.words(),
        },
        dst.start,
        src.start,
        nb,
    );
    debug!(dst.array.logger(), "copy range";
           "strategy" => strategy.name(), "dst" => dst.start, "src" => src.start, "bits" => nb);

    nb
}

/// Exchanges the first `min(a.len(), b.len())` bits of `a` and `b`.  Returns the number of bits
/// swapped.
pub fn swap_range(a: &mut BitRangeMut, b: &mut BitRangeMut) -> usize {
    let nb = cmp::min(a.len, b.len);

    let strategy = engine::transfer(
        &mut SwapBetween {
            a: a.array.words_mut(),
            b: b.array.words_mut(),
        },
        a.start,
        b.start,
        nb,
    );
    debug!(a.array.logger(), "swap range";
           "strategy" => strategy.name(), "a" => a.start, "b" => b.start, "bits" => nb);

    nb
}

/// Writes one `'0'` or `'1'` per bit.
pub(crate) fn write_bits<I: Iterator<Item = bool>>(f: &mut fmt::Formatter, bits: I) -> fmt::Result {
    use std::fmt::Write;

    for bit in bits {
        f.write_char(if bit { '1' } else { '0' })?;
    }
    Ok(())
}

impl<'a> fmt::Display for BitRange<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_bits(f, (self.start..self.start + self.len).map(|k| self.array.bit(k)))
    }
}

impl<'a> fmt::Display for BitRangeMut<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&self.as_range(), f)
    }
}

impl<'a> fmt::Debug for BitRange<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "BitRange {{ start: {}, len: {}, bits: {} }}", self.start, self.len, self)
    }
}

impl<'a> fmt::Debug for BitRangeMut<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.as_range(), f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Capture;
    use rand::Rng;

    const SA: &str = "011011101111011001101011110101101111001100010001000000011110111000101000";
    const SB: &str = "110000001000110111010111010111111100011111111001001011101011000111110000";

    fn randomized(n: usize) -> BitArray {
        let mut rng = rand::thread_rng();
        let mut array = BitArray::new(n);
        for k in 0..n {
            array.put(k, rng.gen()).unwrap();
        }
        array
    }

    fn parse(s: &str) -> BitArray {
        s.parse().unwrap()
    }

    /// What `copy_range` should produce, computed on strings.
    fn expect_copy(dst: &str, d: (usize, usize), src: &str, s: (usize, usize)) -> String {
        let nb = cmp::min(d.1, s.1);
        format!("{}{}{}", &dst[..d.0], &src[s.0..s.0 + nb], &dst[d.0 + nb..])
    }

    /// What `swap_range` should produce on each side, computed on strings.
    fn expect_swap(a: &str, ra: (usize, usize), b: &str, rb: (usize, usize)) -> (String, String) {
        (expect_copy(a, ra, b, rb), expect_copy(b, rb, a, ra))
    }

    fn check_copy(dst: &mut BitArray, d: (usize, usize), src: &BitArray, s: (usize, usize)) {
        let expected = expect_copy(&dst.to_string(), d, &src.to_string(), s);

        let copied = copy_range(
            &mut dst.range_mut(d.0, d.1).unwrap(),
            &src.range(s.0, s.1).unwrap(),
        );

        assert_eq!(cmp::min(d.1, s.1), copied);
        assert_eq!(expected, dst.to_string(), "dst {:?} src {:?}", d, s);
    }

    fn check_swap(a: &mut BitArray, ra: (usize, usize), b: &mut BitArray, rb: (usize, usize)) {
        let (ea, eb) = expect_swap(&a.to_string(), ra, &b.to_string(), rb);

        let swapped = swap_range(
            &mut a.range_mut(ra.0, ra.1).unwrap(),
            &mut b.range_mut(rb.0, rb.1).unwrap(),
        );

        assert_eq!(cmp::min(ra.1, rb.1), swapped);
        assert_eq!(ea, a.to_string(), "a {:?} b {:?}", ra, rb);
        assert_eq!(eb, b.to_string(), "a {:?} b {:?}", ra, rb);
    }

    #[test]
    fn range_bounds_are_checked() {
        let mut array = BitArray::new(10);

        assert!(array.range(0, 10).is_ok());
        assert!(array.range(10, 0).is_ok());
        assert_eq!(
            Err(Error::RangeOutOfBounds {
                start: 3,
                len: 8,
                size: 10
            }),
            array.range(3, 8).map(|r| r.len())
        );
        assert_eq!(
            Err(Error::RangeOutOfBounds {
                start: 11,
                len: 0,
                size: 10
            }),
            array.range_mut(11, 0).map(|r| r.len())
        );
        assert_eq!(
            Err(Error::RangeOutOfBounds {
                start: 1,
                len: usize::max_value(),
                size: 10
            }),
            array.range(1, usize::max_value()).map(|r| r.len())
        );
    }

    #[test]
    fn views_read_and_write_through() {
        let mut array = parse("010111101");
        {
            let view = array.range(1, 5).unwrap();
            assert_eq!(1, view.start());
            assert_eq!(5, view.len());
            assert!(view.get(0).unwrap());
            assert!(!view.get(1).unwrap());
            assert_eq!(Err(Error::IndexOutOfRange { index: 5, len: 5 }), view.get(5));
            assert_eq!(4, view.count_ones());
            assert_eq!("10111", view.to_string());
            assert_eq!("10111", view.to_bit_array().to_string());
        }

        {
            let mut view = array.range_mut(6, 3).unwrap();
            assert!(view.get(0).unwrap());
            assert!(!view.get(1).unwrap());
            assert_eq!(Err(Error::IndexOutOfRange { index: 3, len: 3 }), view.get(3));

            view.put(0, false).unwrap();
            assert!(!view.get(0).unwrap());
            view.put(2, false).unwrap();
            assert_eq!(Err(Error::IndexOutOfRange { index: 3, len: 3 }), view.put(3, true));
            assert_eq!("000", view.to_string());
        }

        assert_eq!("010111000", array.to_string());
    }

    #[test]
    fn empty_views_are_legal() {
        let mut a = BitArray::new(0);
        let b = parse("101");

        let view = b.range(3, 0).unwrap();
        assert!(view.is_empty());
        assert_eq!("", view.to_string());
        assert_eq!(0, view.count_ones());

        assert_eq!(0, copy_range(&mut a.range_mut(0, 0).unwrap(), &b.range(0, 3).unwrap()));
        assert_eq!("", a.to_string());
    }

    #[test]
    fn copy_unaligned_short() {
        let src = parse("011100000");
        let mut dst = parse("101000110");

        copy_range(&mut dst.range_mut(0, 5).unwrap(), &src.range(0, 5).unwrap());
        assert_eq!("011100110", dst.to_string());
    }

    #[test]
    fn copy_aligned_whole_words() {
        let src = randomized(256);
        let mut dst = randomized(256);

        copy_range(&mut dst.range_mut(0, 256).unwrap(), &src.range(0, 256).unwrap());
        assert_eq!(src.to_string(), dst.to_string());
    }

    #[test]
    fn copy_aligned_into_longer_range() {
        let src = randomized(256);
        let mut dst = BitArray::new(512);

        copy_range(&mut dst.range_mut(0, 512).unwrap(), &src.range(0, 256).unwrap());
        assert_eq!(format!("{}{}", src, "0".repeat(256)), dst.to_string());
    }

    #[test]
    fn copy_aligned_with_tail() {
        let src = randomized(256);
        let mut dst = BitArray::new(512);

        copy_range(&mut dst.range_mut(0, 512).unwrap(), &src.range(0, 49).unwrap());
        assert_eq!(format!("{}{}", &src.to_string()[..49], "0".repeat(512 - 49)), dst.to_string());
    }

    #[test]
    fn copy_each_strategy_over_multiple_words() {
        let src = randomized(512);

        //unaligned
        check_copy(&mut randomized(256), (49, 128), &src, (23, 230));
        check_copy(&mut randomized(512), (127, 385), &src, (113, 385));
        //aligned, different words
        check_copy(&mut randomized(512), (128, 384), &src, (64, 384));
        //co-aligned, same and different words
        check_copy(&mut randomized(512), (47, 445), &src, (47, 437));
        check_copy(&mut randomized(512), (47, 300), &src, (175, 330));
        //co-aligned, span ends before the first boundary and exactly on it
        check_copy(&mut randomized(512), (70, 20), &src, (6, 20));
        check_copy(&mut randomized(512), (124, 4), &src, (60, 4));
    }

    #[test]
    fn swap_same_length_short() {
        let mut a = parse("100110011");
        let mut b = parse("000001110");

        swap_range(&mut a.range_mut(0, 5).unwrap(), &mut b.range_mut(0, 5).unwrap());
        assert_eq!("000000011", a.to_string());
        assert_eq!("100111110", b.to_string());
    }

    #[test]
    fn swap_min_length_short() {
        let mut a = parse("100110011");
        let mut b = parse("000001110");

        let swapped = swap_range(&mut a.range_mut(2, 4).unwrap(), &mut b.range_mut(3, 5).unwrap());
        assert_eq!(4, swapped);
        assert_eq!("100011011", a.to_string());
        assert_eq!("000011010", b.to_string());
    }

    #[test]
    fn swap_same_length_long() {
        let mut a = parse(SA);
        let mut b = parse(SB);

        swap_range(&mut a.range_mut(0, 69).unwrap(), &mut b.range_mut(0, 69).unwrap());
        assert_eq!(format!("{}{}", &SB[..69], &SA[69..]), a.to_string());
        assert_eq!(format!("{}{}", &SA[..69], &SB[69..]), b.to_string());
    }

    #[test]
    fn swap_aligned_with_unaligned_long() {
        let mut a = parse(SA);
        let mut b = parse(SB);

        swap_range(&mut a.range_mut(3, 69).unwrap(), &mut b.range_mut(0, 69).unwrap());
        assert_eq!(
            "011110000001000110111010111010111111100011111111001001011101011000111110",
            a.to_string()
        );
        assert_eq!(
            "011101111011001101011110101101111001100010001000000011110111000101000000",
            b.to_string()
        );
    }

    #[test]
    fn swap_min_length_long() {
        let mut a = parse(SA);
        let mut b = parse(SB);

        let swapped = swap_range(
            &mut a.range_mut(6, 66).unwrap(),
            &mut b.range_mut(2, 70).unwrap(),
        );
        assert_eq!(66, swapped);
        assert_eq!(
            "011011000000100011011101011101011111110001111111100100101110101100011111",
            a.to_string()
        );
        assert_eq!(
            "111011110110011010111101011011110011000100010000000111101110001010000000",
            b.to_string()
        );
    }

    #[test]
    fn swap_each_strategy_over_multiple_words() {
        check_swap(&mut randomized(512), (47, 445), &mut randomized(512), (67, 445));
        check_swap(&mut randomized(512), (47, 445), &mut randomized(512), (47, 437));
        check_swap(&mut randomized(512), (0, 445), &mut randomized(512), (0, 437));
        check_swap(&mut randomized(512), (0, 448), &mut randomized(512), (0, 448));
        check_swap(&mut randomized(512), (64, 300), &mut randomized(400), (128, 272));
        check_swap(&mut randomized(200), (13, 40), &mut randomized(300), (141, 50));
    }

    #[test]
    fn min_length_leaves_longer_range_tail_alone() {
        let mut a = randomized(300);
        let mut b = randomized(300);
        let (a_before, b_before) = (a.to_string(), b.to_string());

        swap_range(&mut a.range_mut(10, 50).unwrap(), &mut b.range_mut(20, 200).unwrap());

        assert_eq!(&b_before[70..], &b.to_string()[70..]);
        assert_eq!(&a_before[60..], &a.to_string()[60..]);
        assert_eq!(&a_before[10..60], &b.to_string()[20..70]);
    }

    #[test]
    fn swap_is_self_inverse() {
        let mut rng = rand::thread_rng();

        for _ in 0..300 {
            let n = rng.gen_range(1, 400);
            let m = rng.gen_range(1, 400);
            let mut a = randomized(n);
            let mut b = randomized(m);
            let (a_before, b_before) = (a.clone(), b.clone());

            let a_start = rng.gen_range(0, n);
            let b_start = rng.gen_range(0, m);
            let a_len = rng.gen_range(0, n - a_start + 1);
            let b_len = rng.gen_range(0, m - b_start + 1);

            for _ in 0..2 {
                swap_range(
                    &mut a.range_mut(a_start, a_len).unwrap(),
                    &mut b.range_mut(b_start, b_len).unwrap(),
                );
            }

            assert_eq!(a_before, a, "a {}+{} of {}", a_start, a_len, n);
            assert_eq!(b_before, b, "b {}+{} of {}", b_start, b_len, m);
        }
    }

    #[test]
    fn random_copies_match_strings() {
        let mut rng = rand::thread_rng();

        for _ in 0..300 {
            let src = randomized(rng.gen_range(1, 300));
            let mut dst = randomized(rng.gen_range(1, 300));

            let s_start = rng.gen_range(0, src.len());
            let d_start = rng.gen_range(0, dst.len());
            let s_len = rng.gen_range(0, src.len() - s_start + 1);
            let d_len = rng.gen_range(0, dst.len() - d_start + 1);

            check_copy(&mut dst, (d_start, d_len), &src, (s_start, s_len));
        }
    }

    #[test]
    fn mutable_view_copies_out() {
        let mut array = parse("0011010");
        let view = array.range_mut(2, 4).unwrap();

        assert_eq!(3, view.count_ones());
        assert_eq!("1101", view.to_bit_array().to_string());
        assert_eq!("BitRange { start: 2, len: 4, bits: 1101 }", format!("{:?}", view));
    }

    #[test]
    fn logs_chosen_strategy() {
        let (config, lines) = Capture::config();
        let src = BitArray::with_config(256, config.clone());
        let mut dst = BitArray::with_config(256, config);

        copy_range(&mut dst.range_mut(70, 100).unwrap(), &src.range(6, 100).unwrap());
        swap_range(
            &mut dst.range_mut(0, 128).unwrap(),
            &mut BitArray::new(128).range_mut(0, 128).unwrap(),
        );
        copy_range(&mut dst.range_mut(1, 10).unwrap(), &src.range(2, 10).unwrap());

        let lines = lines.lock().unwrap();
        assert_eq!(5, lines.len(), "{:?}", *lines);
        assert!(lines[0].starts_with("DEBG new bit array"), "{}", lines[0]);
        assert!(lines[0].contains(" len=256"), "{}", lines[0]);

        assert!(lines[2].starts_with("DEBG copy range"), "{}", lines[2]);
        assert!(lines[2].contains(" strategy=co-aligned"), "{}", lines[2]);
        assert!(lines[2].contains(" bits=100"), "{}", lines[2]);

        assert!(lines[3].starts_with("DEBG swap range"), "{}", lines[3]);
        assert!(lines[3].contains(" strategy=aligned"), "{}", lines[3]);

        assert!(lines[4].contains(" strategy=general"), "{}", lines[4]);
    }
}

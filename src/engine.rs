//! The range copy/swap engine.
//!
//! Both operations share one dispatch, `transfer`, which looks at where the two spans start
//! relative to their word boundaries and picks one of three strategies:
//!
//! * `Aligned` - both spans start on a word boundary.  Whole words are moved directly, followed
//! by at most one masked partial word for the tail.
//! * `CoAligned` - both spans start at the same non-zero offset.  One masked partial word winds
//! both sides up to the next boundary, after which this is the aligned case.
//! * `General` - the offsets differ, so no word of one side lines up with a word of the other.
//! Two independent cursors walk the spans one bit at a time.
//!
//! What "move" means (copy or swap, between two arrays or within one) is up to the `Exchange`
//! implementation handed to `transfer`.
use crate::bitarray::SingleBitArray;
use crate::bitfiddling::BitFiddling;
use crate::config::BITS_PER_WORD;
use num::Integer;
use std::cmp;

/// A bit position split into its word index and the bit offset inside that word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cursor {
    pub word: usize,
    pub offset: usize,
}

impl Cursor {
    #[inline]
    pub fn at(index: usize) -> Cursor {
        let (word, offset) = index.div_rem(&BITS_PER_WORD);
        Cursor { word, offset }
    }

    /// Steps to the next bit, rolling over into the next word after offset 63.
    #[inline]
    pub fn advance(&mut self) {
        self.offset += 1;
        if self.offset == BITS_PER_WORD {
            self.word += 1;
            self.offset = 0;
        }
    }
}

/// The bulk path `transfer` takes for a pair of spans.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Strategy {
    Aligned,
    CoAligned,
    General,
}

impl Strategy {
    /// Chooses the strategy for two spans starting at bit offsets `a` and `b` within their words.
    pub fn select(a: usize, b: usize) -> Strategy {
        match (a, b) {
            (0, 0) => Strategy::Aligned,
            (a, b) if a == b => Strategy::CoAligned,
            _ => Strategy::General,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Aligned => "aligned",
            Strategy::CoAligned => "co-aligned",
            Strategy::General => "general",
        }
    }
}

/// The three granularities at which the engine moves bits between side `a` and side `b`.  For a
/// copy, `a` is the destination and `b` the source.
pub(crate) trait Exchange {
    /// Moves `count` whole words starting at word `a` on one side and word `b` on the other.
    fn words(&mut self, a: usize, b: usize, count: usize);

    /// Moves the bits selected by `mask` between word `a` and word `b`.  The mask applies to both
    /// words, so the bits sit at the same offsets on both sides.
    fn masked(&mut self, a: usize, b: usize, mask: u64);

    /// Moves a single bit between two arbitrary positions.
    fn bit(&mut self, a: Cursor, b: Cursor);
}

/// Moves `nb` bits between the span starting at bit `a_start` and the one starting at `b_start`,
/// returning the strategy that was used.  The caller has already checked that both spans are in
/// bounds.
pub(crate) fn transfer<E: Exchange>(
    op: &mut E,
    a_start: usize,
    b_start: usize,
    nb: usize,
) -> Strategy {
    let mut a = Cursor::at(a_start);
    let mut b = Cursor::at(b_start);
    let strategy = Strategy::select(a.offset, b.offset);

    if nb == 0 {
        return strategy;
    }

    match strategy {
        Strategy::Aligned => whole_words(op, a.word, b.word, nb),

        Strategy::CoAligned => {
            //wind both sides up to the next word boundary; the span may end before reaching it
            let head = cmp::min(BITS_PER_WORD - a.offset, nb);
            op.masked(a.word, b.word, bitmask!(head) << a.offset);

            if head < nb {
                whole_words(op, a.word + 1, b.word + 1, nb - head);
            }
        }

        Strategy::General => {
            for _ in 0..nb {
                op.bit(a, b);
                a.advance();
                b.advance();
            }
        }
    }

    strategy
}

/// The aligned case: `nb / 64` whole words, then the remaining `nb % 64` low bits of the next word.
#[inline]
fn whole_words<E: Exchange>(op: &mut E, a: usize, b: usize, nb: usize) {
    let (count, tail) = nb.div_rem(&BITS_PER_WORD);

    if count != 0 {
        op.words(a, b, count);
    }

    if tail != 0 {
        op.masked(a + count, b + count, bitmask!(tail));
    }
}

/// Copies from a source array into a different destination array.
pub(crate) struct CopyBetween<'a> {
    pub dst: &'a mut [u64],
    pub src: &'a [u64],
}

impl<'a> Exchange for CopyBetween<'a> {
    #[inline]
    fn words(&mut self, a: usize, b: usize, count: usize) {
        self.dst[a..a + count].copy_from_slice(&self.src[b..b + count]);
    }

    #[inline]
    fn masked(&mut self, a: usize, b: usize, mask: u64) {
        self.dst[a] = self.dst[a].blend(self.src[b], mask);
    }

    #[inline]
    fn bit(&mut self, a: Cursor, b: Cursor) {
        let val = self.src[b.word].get_bit(b.offset);
        self.dst[a.word].set_bit(a.offset, val);
    }
}

/// Copies between two disjoint spans of the same array.
pub(crate) struct CopyWithin<'a> {
    pub words: &'a mut [u64],
}

impl<'a> Exchange for CopyWithin<'a> {
    #[inline]
    fn words(&mut self, a: usize, b: usize, count: usize) {
        self.words.copy_within(b..b + count, a);
    }

    #[inline]
    fn masked(&mut self, a: usize, b: usize, mask: u64) {
        let src = self.words[b];
        self.words[a] = self.words[a].blend(src, mask);
    }

    #[inline]
    fn bit(&mut self, a: Cursor, b: Cursor) {
        let val = self.words[b.word].get_bit(b.offset);
        self.words[a.word].set_bit(a.offset, val);
    }
}

/// Swaps between two different arrays.
pub(crate) struct SwapBetween<'a> {
    pub a: &'a mut [u64],
    pub b: &'a mut [u64],
}

impl<'a> Exchange for SwapBetween<'a> {
    #[inline]
    fn words(&mut self, a: usize, b: usize, count: usize) {
        self.a[a..a + count].swap_with_slice(&mut self.b[b..b + count]);
    }

    #[inline]
    fn masked(&mut self, a: usize, b: usize, mask: u64) {
        let (x, y) = (self.a[a], self.b[b]);
        self.a[a] = x.blend(y, mask);
        self.b[b] = y.blend(x, mask);
    }

    #[inline]
    fn bit(&mut self, a: Cursor, b: Cursor) {
        let x = self.a[a.word].get_bit(a.offset);
        let y = self.b[b.word].get_bit(b.offset);
        self.a[a.word].set_bit(a.offset, y);
        self.b[b.word].set_bit(b.offset, x);
    }
}

/// Swaps between two disjoint spans of the same array.
pub(crate) struct SwapWithin<'a> {
    pub words: &'a mut [u64],
}

impl<'a> Exchange for SwapWithin<'a> {
    #[inline]
    fn words(&mut self, a: usize, b: usize, count: usize) {
        for i in 0..count {
            self.words.swap(a + i, b + i);
        }
    }

    #[inline]
    fn masked(&mut self, a: usize, b: usize, mask: u64) {
        let (x, y) = (self.words[a], self.words[b]);
        self.words[a] = x.blend(y, mask);
        //re-read `b`, which is the same word as `a` if the spans overlap
        self.words[b] = self.words[b].blend(x, mask);
    }

    #[inline]
    fn bit(&mut self, a: Cursor, b: Cursor) {
        let x = self.words[a.word].get_bit(a.offset);
        let y = self.words[b.word].get_bit(b.offset);
        self.words[a.word].set_bit(a.offset, y);
        self.words[b.word].set_bit(b.offset, x);
    }
}

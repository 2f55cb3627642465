// Copyright (c) 2020 Helge Wrede, Alexander Schultheiß, Lukas Simon
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Bucket storage: bits packed into 32-bit words.
use std::fmt::Debug;

/// Bits per bucket word.
pub const BUCKET_BITS: usize = 32;

/// A fixed-length bit vector backed by `u32` words.
#[derive(Clone, PartialEq, Eq)]
pub struct Buckets {
    words: Vec<u32>,
}

impl Buckets {
    /// Create zeroed storage holding at least `capacity` bits, rounded up to
    /// the nearest multiple of 32.
    pub fn new(capacity: usize) -> Self {
        let word_length = if capacity % BUCKET_BITS == 0 {
            capacity / BUCKET_BITS
        } else {
            1 + capacity / BUCKET_BITS
        };

        Self {
            words: vec![0; word_length],
        }
    }

    /// Get the length in bits of the storage.
    pub fn len(&self) -> usize {
        self.words.len() * BUCKET_BITS
    }

    /// Check whether the storage has no words.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Set a single bit to `1`.
    pub fn set(&mut self, index: usize) {
        if index >= self.len() {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index,
            )
        }
        self.words[index / BUCKET_BITS] |= 1 << (index % BUCKET_BITS);
    }

    /// Check whether a bit is set.
    pub fn is_set(&self, index: usize) -> bool {
        if index >= self.len() {
            panic!(
                "index out of bounds: the len is {} but the index is {}",
                self.len(),
                index,
            )
        }
        self.words[index / BUCKET_BITS] & (1 << (index % BUCKET_BITS)) != 0
    }

    /// Count the number of `1` bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| popcnt(*w) as usize).sum()
    }

    /// Count the number of `0` bits.
    pub fn count_zeros(&self) -> usize {
        self.len() - self.count_ones()
    }

    /// Return the union of two equal-length bucket arrays.
    /// This is a bitwise `OR` of the words.
    pub fn union(&self, other: &Self) -> Self {
        if self.words.len() != other.words.len() {
            panic!(
                "unable to union buckets with different lengths: {} and {}",
                self.len(),
                other.len()
            );
        }
        Self {
            words: self
                .words
                .iter()
                .zip(other.words.iter())
                .map(|(a, b)| a | b)
                .collect(),
        }
    }

    /// Return the underlying words.
    pub fn as_words(&self) -> &[u32] {
        &self.words
    }
}

/// Count set bits in a word with the parallel bit-counting trick.
///
/// See <http://graphics.stanford.edu/~seander/bithacks.html#CountBitsSetParallel>.
#[inline]
pub fn popcnt(mut v: u32) -> u32 {
    v -= (v >> 1) & 0x5555_5555;
    v = (v & 0x3333_3333) + ((v >> 2) & 0x3333_3333);
    ((v + (v >> 4)) & 0x0f0f_0f0f).wrapping_mul(0x0101_0101) >> 24
}

impl From<Vec<u32>> for Buckets {
    fn from(words: Vec<u32>) -> Self {
        Self { words }
    }
}

impl From<Buckets> for Vec<u32> {
    fn from(other: Buckets) -> Vec<u32> {
        other.words
    }
}

impl Debug for Buckets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bits: String = (0..self.len())
            .map(|i| if self.is_set(i) { '1' } else { '0' })
            .collect();
        write!(f, "Buckets({})", bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_round_up_to_words() {
        let buckets = Buckets::new(1);
        assert_eq!(32, buckets.len());
        assert_eq!(1, buckets.words.len());

        let buckets = Buckets::new(32);
        assert_eq!(32, buckets.len());
        assert_eq!(1, buckets.words.len());

        let buckets = Buckets::new(33);
        assert_eq!(64, buckets.len());
        assert_eq!(2, buckets.words.len());

        let buckets = Buckets::new(1000);
        assert_eq!(1024, buckets.len());
        assert_eq!(32, buckets.words.len());

        assert!(Buckets::new(0).is_empty());
    }

    #[test]
    fn set_first_bit_only() {
        let mut buckets = Buckets::new(32);
        buckets.set(0);
        assert!(buckets.is_set(0));
        assert!(!buckets.is_set(1));
        assert!(!buckets.is_set(31));
        assert_eq!(buckets.as_words(), &[1]);
    }

    #[test]
    fn set_high_bit_of_word() {
        let mut buckets = Buckets::new(64);
        buckets.set(31);
        buckets.set(32);
        assert_eq!(buckets.as_words(), &[0x8000_0000, 1]);
        for i in 0..64 {
            assert_eq!(i == 31 || i == 32, buckets.is_set(i));
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn must_set_with_correct_index() {
        Buckets::new(5).set(32);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn must_get_with_correct_index() {
        Buckets::new(64).is_set(64);
    }

    #[test]
    fn set_is_idempotent() {
        let mut buckets = Buckets::new(96);
        buckets.set(40);
        let once = buckets.clone();
        buckets.set(40);

        assert_eq!(once, buckets);
        assert_eq!(1, buckets.count_ones());
        assert_eq!(95, buckets.count_zeros());
    }

    #[test]
    fn count_each_bit_one_by_one() {
        let mut buckets = Buckets::new(64);
        assert_eq!(0, buckets.count_ones());
        assert_eq!(64, buckets.count_zeros());

        for i in 0..64 {
            buckets.set(i);
            assert!(buckets.is_set(i));
            assert_eq!(i + 1, buckets.count_ones());
            assert_eq!(63 - i, buckets.count_zeros());
        }
        assert_eq!(buckets.as_words(), &[u32::MAX, u32::MAX]);
    }

    #[test]
    fn popcnt_matches_count_ones() {
        assert_eq!(0, popcnt(0));
        assert_eq!(32, popcnt(u32::MAX));
        assert_eq!(16, popcnt(0x5555_5555));
        assert_eq!(1, popcnt(0x8000_0000));

        let rng = fastrand::Rng::with_seed(1);
        for _ in 0..10_000 {
            let v = rng.u32(..);
            assert_eq!(v.count_ones(), popcnt(v), "popcnt({:#x})", v);
        }
    }

    #[test]
    fn buckets_union() {
        let mut a = Buckets::new(64);
        a.set(0);
        a.set(35);

        let mut b = Buckets::new(64);
        b.set(2);
        b.set(35);
        b.set(63);

        let union = a.union(&b);
        assert_eq!(4, union.count_ones());
        assert_eq!(60, union.count_zeros());
        for i in [0, 2, 35, 63] {
            assert!(union.is_set(i));
        }
    }

    #[test]
    #[should_panic(expected = "different lengths")]
    fn union_needs_equal_lengths() {
        Buckets::new(32).union(&Buckets::new(64));
    }

    #[test]
    fn words_round_trip() {
        let buckets = Buckets::from(vec![8, 0x8000_0000]);
        assert_eq!(64, buckets.len());
        assert!(buckets.is_set(3));
        assert!(buckets.is_set(63));

        let words: Vec<u32> = buckets.into();
        assert_eq!(words, vec![8, 0x8000_0000]);
    }
}

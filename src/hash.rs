// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! FNV-1a hashing and bit location generation.
//!
//! Every constant in this module is part of the serialized format: a filter
//! dumped by one implementation can only be queried by another if both derive
//! the exact same bit locations for the same value.
use std::iter::FusedIterator;

/// FNV offset basis.
pub const OFFSET_BASIS: u32 = 2_166_136_261;

/// Seed of the second hash used to derive the location stride.
pub const STRIDE_SEED: u32 = 1_576_284_489;

/// Fowler/Noll/Vo hash of a string, with an optional seed folded into the
/// offset basis. A seed of `0` gives the unseeded hash.
///
/// The string is consumed as UTF-16 code units. For each unit with a non-zero
/// high byte, the high byte is folded in first, then the low byte. The result
/// is passed through [`fnv_mix`] and returned as a signed 32-bit integer.
pub fn fnv_1a(value: &str, seed: u32) -> i32 {
    let mut a = OFFSET_BASIS ^ seed;

    for c in value.encode_utf16() {
        let c = u32::from(c);
        let d = c & 0xff00;
        if d != 0 {
            a = fnv_multiply(a ^ (d >> 8));
        }
        a = fnv_multiply(a ^ (c & 0xff));
    }
    fnv_mix(a) as i32
}

/// `a * 16777619 mod 2^32`, as a sum of shifts.
#[inline]
pub fn fnv_multiply(a: u32) -> u32 {
    a.wrapping_add(a << 1)
        .wrapping_add(a << 4)
        .wrapping_add(a << 7)
        .wrapping_add(a << 8)
        .wrapping_add(a << 24)
}

/// Avalanche step applied to the final FNV state.
#[inline]
pub fn fnv_mix(mut a: u32) -> u32 {
    a = a.wrapping_add(a << 13);
    a ^= a >> 7;
    a = a.wrapping_add(a << 3);
    a ^= a >> 17;
    a = a.wrapping_add(a << 5);
    a
}

/// The bit locations of a single value, using double hashing.
///
/// Only two hashes are computed per value. The first picks a starting bit,
/// the second a stride, and each following location is one stride further
/// along, modulo the filter size. See Kirsch and Mitzenmacher, *Less Hashing,
/// Same Performance: Building a Better Bloom Filter*.
#[derive(Clone, Debug)]
pub struct Locations {
    next: usize,
    stride: usize,
    nbits: usize,
    remaining: usize,
}

impl Locations {
    /// Return the `nhashes` locations of `value` in a filter of `nbits` bits.
    ///
    /// Panics if `nbits` is zero.
    pub fn new(value: &str, nbits: usize, nhashes: usize) -> Self {
        assert!(nbits > 0, "locations requested for a filter with no bits");

        let a = fnv_1a(value, 0);
        let b = fnv_1a(value, STRIDE_SEED);

        Self {
            next: reduce(a, nbits),
            stride: reduce(b, nbits),
            nbits,
            remaining: nhashes,
        }
    }
}

impl Iterator for Locations {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let location = self.next;
        // `next + stride` may not fit in a `usize`.
        self.next = if location >= self.nbits - self.stride {
            location - (self.nbits - self.stride)
        } else {
            location + self.stride
        };
        Some(location)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Locations {}

impl FusedIterator for Locations {}

/// Map a signed hash into `[0, nbits)`.
fn reduce(hash: i32, nbits: usize) -> usize {
    i128::from(hash).rem_euclid(nbits as i128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_1a_reference_values() {
        assert_eq!(fnv_1a("abc", 0), 33957123);
        assert_eq!(fnv_1a("abc", STRIDE_SEED), 1908288307);
        assert_eq!(fnv_1a("", 0), 1493338014);
        assert_eq!(fnv_1a("", STRIDE_SEED), -1554989545);
        assert_eq!(fnv_1a("x", 0), -1944952413);
        assert_eq!(fnv_1a("x", STRIDE_SEED), 1786674816);
        assert_eq!(fnv_1a("y", 0), 689834981);
        assert_eq!(fnv_1a("y", STRIDE_SEED), 78576076);
    }

    #[test]
    fn fnv_1a_folds_high_bytes() {
        assert_eq!(fnv_1a("é€", 0), 51795375);
        // Outside the BMP, as a surrogate pair.
        assert_eq!(fnv_1a("\u{1F600}", 0), 187876127);
    }

    #[test]
    fn fnv_1a_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(fnv_1a("abc", 0), fnv_1a("abc", 0));
            assert_eq!(fnv_1a("abc", STRIDE_SEED), fnv_1a("abc", STRIDE_SEED));
        }
        assert_ne!(fnv_1a("abc", 0), fnv_1a("abc", STRIDE_SEED));
    }

    #[test]
    fn fnv_multiply_is_prime_multiplication() {
        let rng = fastrand::Rng::with_seed(7);
        for _ in 0..1000 {
            let a = rng.u32(..);
            assert_eq!(fnv_multiply(a), a.wrapping_mul(16_777_619));
        }
    }

    #[test]
    fn locations_small_filter() {
        assert_eq!(Locations::new("x", 32, 2).collect::<Vec<_>>(), vec![3, 3]);
        assert_eq!(Locations::new("y", 32, 2).collect::<Vec<_>>(), vec![5, 17]);
    }

    #[test]
    fn locations_follow_stride() {
        assert_eq!(
            Locations::new("hello", 1024, 4).collect::<Vec<_>>(),
            vec![137, 647, 133, 643]
        );
        assert_eq!(
            Locations::new("5", 1024, 4).collect::<Vec<_>>(),
            vec![202, 64, 950, 812]
        );
        assert_eq!(
            Locations::new("foo", 64, 3).collect::<Vec<_>>(),
            vec![47, 9, 35]
        );
    }

    #[test]
    fn locations_are_in_range() {
        let rng = fastrand::Rng::with_seed(42);
        for _ in 0..1000 {
            let nbits = rng.usize(1..100_000);
            let value = rng.u64(..).to_string();

            for location in Locations::new(&value, nbits, 8) {
                assert!(location < nbits, "{location} is out of range for {nbits}");
            }
        }
    }

    #[test]
    fn locations_exact_size() {
        let locations = Locations::new("abc", 256, 5);
        assert_eq!(locations.len(), 5);
        assert_eq!(Locations::new("abc", 256, 0).count(), 0);
    }

    #[test]
    #[should_panic(expected = "no bits")]
    fn locations_need_bits() {
        Locations::new("abc", 0, 1);
    }
}

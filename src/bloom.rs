// Copyright (c) 2018 Aleksandr Bezobchuk
// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! A Bloom filter using FNV-1a and double hashing.

use std::f64;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::buckets::{Buckets, BUCKET_BITS};
use crate::error::{Error, Result};
use crate::hash::Locations;

/// The default false positive probability value, 1%.
pub const DEFAULT_FALSE_POSITIVE_RATE: f64 = 0.01;

/// `ln` squared.
const LN_SQR: f64 = f64::consts::LN_2 * f64::consts::LN_2;

/// A Bloom filter over the string form of values.
///
/// Values are hashed through their [`Display`] output, so `42`, `"42"` and
/// `String::from("42")` are the same value to the filter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Dump", into = "Dump")]
pub struct BloomFilter {
    buckets: Buckets,
    nhashes: usize,
}

impl BloomFilter {
    /// Return an empty Bloom filter of at least `nbits` bits, rounded up to a
    /// multiple of 32, probing `nhashes` bits per value.
    pub fn new(nbits: usize, nhashes: usize) -> Result<BloomFilter> {
        if nbits == 0 {
            return Err(Error::ZeroCapacity);
        }
        if nbits > usize::MAX - (BUCKET_BITS - 1) {
            return Err(Error::CapacityOverflow(nbits));
        }
        let filter = BloomFilter::from_parts(Buckets::new(nbits), nhashes)?;
        tracing::debug!(
            requested = nbits,
            bits = filter.bits(),
            hashes = nhashes,
            "Created bloom filter"
        );

        Ok(filter)
    }

    /// Return a new Bloom filter with a given approximate item capacity.
    /// The false positive probability is [`DEFAULT_FALSE_POSITIVE_RATE`].
    pub fn with_capacity(capacity: usize) -> Result<BloomFilter> {
        BloomFilter::with_rate(capacity, DEFAULT_FALSE_POSITIVE_RATE)
    }

    /// Return a new Bloom filter with a given approximate item capacity
    /// and a desired false positive rate.
    pub fn with_rate(capacity: usize, fp_rate: f64) -> Result<BloomFilter> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        if fp_rate.is_nan() || fp_rate <= 0. || fp_rate >= 1. {
            return Err(Error::InvalidRate(fp_rate));
        }
        let nbits = optimal_bits(capacity, fp_rate);
        let nhashes = optimal_hashes(nbits, capacity);

        BloomFilter::new(nbits, nhashes)
    }

    /// Reconstruct a filter from a bucket dump, as returned by
    /// [`BloomFilter::serialize`]. The hash count is not part of the dump and
    /// must be the one the original filter was created with.
    pub fn from_buckets(buckets: &[i32], nhashes: usize) -> Result<BloomFilter> {
        let words = buckets.iter().map(|w| *w as u32).collect::<Vec<_>>();
        let filter = BloomFilter::from_parts(Buckets::from(words), nhashes)?;
        tracing::debug!(
            bits = filter.bits(),
            hashes = nhashes,
            "Loaded bloom filter from buckets"
        );

        Ok(filter)
    }

    /// Reconstruct a filter from the JSON text returned by
    /// [`BloomFilter::to_json`].
    ///
    /// Each element is reduced modulo 2<sup>32</sup>, so words written as
    /// unsigned integers are accepted as well as signed ones.
    pub fn from_json(json: &str, nhashes: usize) -> Result<BloomFilter> {
        let words = serde_json::from_str::<Vec<i64>>(json)?
            .into_iter()
            .map(|w| w as u32)
            .collect::<Vec<_>>();
        let filter = BloomFilter::from_parts(Buckets::from(words), nhashes)?;
        tracing::debug!(
            bits = filter.bits(),
            hashes = nhashes,
            "Loaded bloom filter from json"
        );

        Ok(filter)
    }

    fn from_parts(buckets: Buckets, nhashes: usize) -> Result<BloomFilter> {
        if buckets.is_empty() {
            return Err(Error::ZeroCapacity);
        }
        if nhashes == 0 {
            return Err(Error::ZeroHashes);
        }
        Ok(BloomFilter { buckets, nhashes })
    }

    /// Add a value to the Bloom filter. This operation is idempotent with
    /// regards to each unique value.
    pub fn add<T: Display + ?Sized>(&mut self, item: &T) {
        for index in self.locations(item) {
            self.buckets.set(index);
        }
    }

    /// Return whether or not a given value is likely in the Bloom filter. There is a
    /// possibility for a false positive, see [`BloomFilter::false_positive_rate`],
    /// but a false negative will never occur.
    pub fn test<T: Display + ?Sized>(&self, item: &T) -> bool {
        self.locations(item).all(|index| self.buckets.is_set(index))
    }

    /// Estimate the number of distinct values added to the filter.
    ///
    /// The estimate grows without bound as the filter saturates, and is
    /// infinite once every bit is set.
    pub fn size(&self) -> f64 {
        let nbits = self.bits() as f64;
        let nbits_set = self.buckets.count_ones() as f64;
        let nhashes = self.nhashes as f64;

        -nbits * (1. - nbits_set / nbits).ln() / nhashes
    }

    /// Probability that a value never added tests positive, given the bits
    /// currently set.
    pub fn false_positive_rate(&self) -> f64 {
        let fill = self.buckets.count_ones() as f64 / self.bits() as f64;

        fill.powi(self.nhashes as i32)
    }

    /// Return the bit locations probed for a value.
    pub fn locations<T: Display + ?Sized>(&self, item: &T) -> Locations {
        Locations::new(&item.to_string(), self.bits(), self.nhashes)
    }

    /// Return the number of bits in this filter (`m` parameter).
    pub fn bits(&self) -> usize {
        self.buckets.len()
    }

    /// Number of hashes used (`k` parameter).
    pub fn hashes(&self) -> usize {
        self.nhashes
    }

    /// Number of bits set.
    pub fn count_ones(&self) -> usize {
        self.buckets.count_ones()
    }

    /// Compute the union of two Bloom filters.
    pub fn union(&self, other: &Self) -> Result<Self> {
        if !self.is_comparable(other) {
            return Err(Error::Incompatible {
                bits: self.bits(),
                hashes: self.nhashes,
                other_bits: other.bits(),
                other_hashes: other.nhashes,
            });
        }
        let buckets = self.buckets.union(&other.buckets);
        tracing::debug!(bits = self.bits(), "Merged bloom filters");

        Ok(Self {
            buckets,
            nhashes: self.nhashes,
        })
    }

    /// Check whether two filters can be unioned.
    pub fn is_comparable(&self, other: &Self) -> bool {
        self.nhashes == other.nhashes && self.bits() == other.bits()
    }

    /// Return the bucket words, in order, as signed integers.
    pub fn serialize(&self) -> Vec<i32> {
        self.buckets.as_words().iter().map(|w| *w as i32).collect()
    }

    /// Return the bucket words as a JSON array of signed integers.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(&self.serialize()).map_err(Error::from)
    }

    /// Return the underlying bucket words.
    pub fn as_words(&self) -> &[u32] {
        self.buckets.as_words()
    }
}

/// Return the optimal bit vector size for a Bloom filter given an approximate
/// size and a desired false positive rate.
pub fn optimal_bits(capacity: usize, fp_rate: f64) -> usize {
    (-((fp_rate.ln() * (capacity as f64)) / LN_SQR)).ceil() as usize
}

/// Return the optimal number of hash functions for a Bloom filter given a
/// bit vector size and an approximate set size. Never less than one.
///
/// Also called `k`.
pub fn optimal_hashes(nbits: usize, capacity: usize) -> usize {
    (((nbits / capacity) as f64) * f64::consts::LN_2)
        .ceil()
        .max(1.) as usize
}

impl AsRef<[u32]> for BloomFilter {
    fn as_ref(&self) -> &[u32] {
        self.buckets.as_words()
    }
}

/// Serde form of a filter, carrying the hash count next to the buckets.
#[derive(Serialize, Deserialize)]
struct Dump {
    hashes: usize,
    buckets: Vec<i32>,
}

impl From<BloomFilter> for Dump {
    fn from(other: BloomFilter) -> Dump {
        Dump {
            hashes: other.nhashes,
            buckets: other.serialize(),
        }
    }
}

impl TryFrom<Dump> for BloomFilter {
    type Error = Error;

    fn try_from(dump: Dump) -> Result<BloomFilter> {
        BloomFilter::from_buckets(&dump.buckets, dump.hashes)
    }
}

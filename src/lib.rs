//! A portable implementation of a Bloom filter, a space-efficient probabilistic
//! data structure.
//!
//! # Bloom Filters
//!
//! A Bloom filter is a space-efficient probabilistic data structure that is
//! used to test whether an element is a member of a set. It allows for queries
//! to return: "possibly in set" or "definitely not in set". Elements can be
//! added to the set, but not removed; the more elements that are added to the
//! set, the larger the probability of false positives.
//!
//! The filter is a fixed array of 32-bit bucket words. It can be created from a
//! bit count and a number of hashes, from an expected item count and false
//! positive rate, or from a bucket dump of another filter.
//!
//! # Double Hashing
//!
//! Each value is hashed only twice, with a seeded FNV-1a variant, and `k` bit
//! positions are derived from the two hashes:
//!
//! g<sub>i</sub>(x) = (H<sub>1</sub>(x) + iH<sub>2</sub>(x)) mod m
//!
//! as shown by Adam Kirsch and Michael Mitzenmacher in *Less Hashing, Same
//! Performance: Building a Better Bloom Filter*.
//!
//! Values are hashed through their string form, and the hash is fully
//! specified, so bucket dumps can be exchanged with any implementation using
//! the same scheme. The dump does not include `k`.
//!
//! # Example
//!
//! ```
//! use fnvbloom::BloomFilter;
//!
//! let mut filter = BloomFilter::new(1024, 4)?;
//!
//! filter.add("foo");
//! filter.add(&42);
//!
//! assert!(filter.test("foo"));
//! assert!(filter.test("42"));
//!
//! let dump = filter.serialize();
//! let copy = BloomFilter::from_buckets(&dump, filter.hashes())?;
//! assert_eq!(filter, copy);
//!
//! filter.size(); // ~2.0
//! # Ok::<(), fnvbloom::Error>(())
//! ```
#![warn(missing_docs)]

pub mod bloom;
pub mod buckets;
pub mod error;
pub mod hash;

pub use bloom::BloomFilter;
pub use error::{Error, Result};

// Copyright (c) 2022 Alexis Sellier
//
// Licensed under the MIT license.

//! Errors returned when building or decoding a filter.

/// A filter could not be constructed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A filter needs at least one bit, or one bucket word.
    #[error("bloom filter capacity must be at least one bit")]
    ZeroCapacity,
    /// A filter needs at least one hash round.
    #[error("bloom filter must use at least one hash")]
    ZeroHashes,
    /// The requested bit count cannot be rounded up to a multiple of 32.
    #[error("bloom filter capacity of {0} bits is too large")]
    CapacityOverflow(usize),
    /// The false positive rate is not in the open interval `(0, 1)`.
    #[error("false positive rate must be between 0 and 1 exclusive, got {0}")]
    InvalidRate(f64),
    /// Two filters with different configurations were combined.
    #[error(
        "unable to combine filters with different configurations: \
         {bits} bits with {hashes} hashes, and {other_bits} bits with {other_hashes} hashes"
    )]
    Incompatible {
        /// Bits in the receiving filter.
        bits: usize,
        /// Hashes in the receiving filter.
        hashes: usize,
        /// Bits in the other filter.
        other_bits: usize,
        /// Hashes in the other filter.
        other_hashes: usize,
    },
    /// Bucket JSON could not be encoded or decoded.
    #[error("invalid bucket json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

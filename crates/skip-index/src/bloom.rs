//! Bloom filter over opaque byte-string elements.
//!
//! The filter derives all of its bit positions from a single SHA-256 digest:
//! the first three non-overlapping 4-byte chunks of the digest are read as
//! big-endian unsigned integers and reduced modulo the filter width. This
//! exact derivation (three lanes of one digest, not three independent hash
//! functions) is part of the persisted format and must not change, otherwise
//! filters written by earlier runs become unreadable.

use crate::types::{SkipError, SkipResult};
use sha2::{Digest, Sha256};

/// Number of bit positions derived per element.
const NUM_HASHES: usize = 3;

/// Bytes of digest consumed per bit position.
const CHUNK_SIZE: usize = 4;

/// A fixed-size Bloom filter.
///
/// The bit array is backed by 64-bit words. Bit `i` lives in word `i / 64`,
/// most significant bit first, and words serialize big-endian, so the wire
/// form is independent of host endianness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilter {
    words: Vec<u64>,
}

impl BloomFilter {
    /// Creates an all-zero filter of `size` bytes.
    ///
    /// Returns [`SkipError::InvalidSize`] unless `size` is a positive
    /// multiple of 8.
    pub fn new(size: usize) -> SkipResult<Self> {
        if size == 0 || size % 8 != 0 {
            return Err(SkipError::InvalidSize(size));
        }
        Ok(Self { words: vec![0u64; size / 8] })
    }

    /// Wraps an existing byte representation as a filter of `data.len()`
    /// bytes.
    ///
    /// Returns [`SkipError::InvalidSize`] unless the length is a positive
    /// multiple of 8.
    pub fn from_bytes(data: &[u8]) -> SkipResult<Self> {
        if data.is_empty() || data.len() % 8 != 0 {
            return Err(SkipError::InvalidSize(data.len()));
        }
        let words = data
            .chunks_exact(8)
            .map(|c| u64::from_be_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect();
        Ok(Self { words })
    }

    /// Returns the size of the filter in bytes.
    pub fn size(&self) -> usize {
        self.words.len() * 8
    }

    /// Inserts an element into the filter.
    pub fn insert(&mut self, element: &[u8]) {
        for bit in self.bit_positions(element) {
            self.set(bit);
        }
    }

    /// Checks whether an element might have been inserted.
    ///
    /// A `false` result is definitive; `true` may be a false positive with a
    /// probability governed by the filter size and the number of inserted
    /// elements.
    pub fn contains(&self, element: &[u8]) -> bool {
        self.bit_positions(element).into_iter().all(|bit| self.get(bit))
    }

    /// Merges another filter into this one with a bitwise OR.
    ///
    /// Returns [`SkipError::SizeMismatch`] if the sizes differ. Merging is
    /// commutative and idempotent.
    pub fn merge(&mut self, other: &Self) -> SkipResult<()> {
        if self.size() != other.size() {
            return Err(SkipError::SizeMismatch { expected: self.size(), actual: other.size() });
        }
        for (word, other_word) in self.words.iter_mut().zip(&other.words) {
            *word |= other_word;
        }
        Ok(())
    }

    /// Serializes the filter to its raw bit-array bytes, no header.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.size());
        for word in &self.words {
            out.extend_from_slice(&word.to_be_bytes());
        }
        out
    }

    /// Returns the number of set bits.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|word| word.count_ones()).sum()
    }

    /// Returns `true` if no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }

    /// Derives the bit positions for an element.
    fn bit_positions(&self, element: &[u8]) -> [usize; NUM_HASHES] {
        let digest = Sha256::digest(element);
        let num_bits = (self.size() * 8) as u32;
        let mut positions = [0usize; NUM_HASHES];
        for (lane, position) in positions.iter_mut().enumerate() {
            let o = lane * CHUNK_SIZE;
            let chunk = u32::from_be_bytes([digest[o], digest[o + 1], digest[o + 2], digest[o + 3]]);
            *position = (chunk % num_bits) as usize;
        }
        positions
    }

    /// Sets bit `i`.
    fn set(&mut self, i: usize) {
        self.words[i / 64] |= 1u64 << (63 - (i % 64));
    }

    /// Returns bit `i`.
    fn get(&self, i: usize) -> bool {
        self.words[i / 64] & (1u64 << (63 - (i % 64))) != 0
    }
}

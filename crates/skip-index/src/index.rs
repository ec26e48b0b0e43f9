//! The per-block index record and its serialized layout.
//!
//! A block index pairs the block's own Bloom filter (summarizing the events
//! of that block alone) with its skip index (summarizing the predecessors).
//! One record exists per block, written once at construction time and never
//! revised.
//!
//! Serialized layout, all integers 4-byte big-endian:
//!
//! ```text
//! i32 filter_size | i32 num_entries | filter bytes | entry 0 bytes | ...
//! ```

use crate::{
    bloom::BloomFilter,
    skip::SkipIndex,
    types::{SkipError, SkipResult},
};

/// The indexing record associated with a single block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockIndex {
    /// Bloom filter summarizing the events in the block itself.
    pub filter: BloomFilter,
    /// Skip index summarizing the events of the predecessors.
    pub skip: SkipIndex,
}

impl BlockIndex {
    /// Creates a block index from an own filter and a skip index.
    ///
    /// The skip entries must share the own filter's size; records mixing
    /// sizes could never have been produced by one deployment and are
    /// rejected with [`SkipError::SizeMismatch`].
    pub fn new(filter: BloomFilter, skip: SkipIndex) -> SkipResult<Self> {
        if let Some(entry_size) = skip.filter_size() {
            if entry_size != filter.size() {
                return Err(SkipError::SizeMismatch {
                    expected: filter.size(),
                    actual: entry_size,
                });
            }
        }
        Ok(Self { filter, skip })
    }

    /// Returns the serialized size of this record in bytes.
    pub fn serialized_size(&self) -> usize {
        2 * size_of::<i32>() + (1 + self.skip.num_entries()) * self.filter.size()
    }

    /// Serializes the record.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.serialized_size());
        out.extend_from_slice(&(self.filter.size() as i32).to_be_bytes());
        out.extend_from_slice(&(self.skip.num_entries() as i32).to_be_bytes());
        out.extend_from_slice(&self.filter.to_bytes());
        for entry in self.skip.entries() {
            out.extend_from_slice(&entry.to_bytes());
        }
        out
    }

    /// Deserializes a record from its exact byte layout.
    ///
    /// Returns [`SkipError::MalformedData`] if the header is incomplete, a
    /// header field is negative, or the total length differs from the one the
    /// header implies. Truncated and padded inputs are both rejected.
    pub fn from_bytes(data: &[u8]) -> SkipResult<Self> {
        if data.len() < 8 {
            return Err(SkipError::MalformedData(format!(
                "block index header needs 8 bytes, got {}",
                data.len()
            )));
        }
        let filter_size = i32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let num_entries = i32::from_be_bytes([data[4], data[5], data[6], data[7]]);
        if filter_size < 0 || num_entries < 0 {
            return Err(SkipError::MalformedData(format!(
                "negative header field: filter_size {filter_size}, num_entries {num_entries}"
            )));
        }
        let filter_size = filter_size as usize;
        let num_entries = num_entries as usize;

        let expected = 8 + (1 + num_entries) * filter_size;
        if data.len() != expected {
            return Err(SkipError::MalformedData(format!(
                "block index length {} does not match declared layout ({expected} bytes)",
                data.len()
            )));
        }

        let filter = BloomFilter::from_bytes(&data[8..8 + filter_size])?;
        let mut entries = Vec::with_capacity(num_entries);
        for j in 0..num_entries {
            let start = 8 + (1 + j) * filter_size;
            entries.push(BloomFilter::from_bytes(&data[start..start + filter_size])?);
        }
        Self::new(filter, SkipIndex::from_entries(entries)?)
    }
}

//! The per-block skip index: an ordered array of Bloom filters enabling
//! exponential backward jumps along the chain.
//!
//! Entry `j` of the skip index belonging to a block at height `h` summarizes
//! the own filters of every block in the window `[h - 2^j, h - 1]`; an empty
//! or out-of-history window leaves the entry all-zero. The construction
//! algorithm in [`crate::builder`] is the only code that populates entries.

use crate::{
    bloom::BloomFilter,
    types::{SkipError, SkipResult},
};

/// An ordered array of Bloom filters, one per doubling-sized backward window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipIndex {
    entries: Vec<BloomFilter>,
}

impl SkipIndex {
    /// Creates a skip index of `num_entries` all-zero filters of
    /// `filter_size` bytes each.
    pub fn new(num_entries: usize, filter_size: usize) -> SkipResult<Self> {
        let mut entries = Vec::with_capacity(num_entries);
        for _ in 0..num_entries {
            entries.push(BloomFilter::new(filter_size)?);
        }
        Ok(Self { entries })
    }

    /// Wraps an existing sequence of filters, as read back from storage.
    ///
    /// All entries must share one size; a mixed sequence indicates corrupted
    /// or inconsistently configured data and is rejected with
    /// [`SkipError::SizeMismatch`].
    pub fn from_entries(entries: Vec<BloomFilter>) -> SkipResult<Self> {
        if let Some(first) = entries.first() {
            let expected = first.size();
            for entry in &entries[1..] {
                if entry.size() != expected {
                    return Err(SkipError::SizeMismatch { expected, actual: entry.size() });
                }
            }
        }
        Ok(Self { entries })
    }

    /// Returns the `j`-th entry.
    ///
    /// Returns [`SkipError::IndexOutOfRange`] unless `j < num_entries()`.
    pub fn entry(&self, j: usize) -> SkipResult<&BloomFilter> {
        self.entries
            .get(j)
            .ok_or(SkipError::IndexOutOfRange { index: j, len: self.entries.len() })
    }

    /// Returns the number of entries.
    pub fn num_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the entries in index order.
    pub fn entries(&self) -> &[BloomFilter] {
        &self.entries
    }

    /// Returns the shared filter size in bytes, or `None` for an entry-less
    /// index.
    pub fn filter_size(&self) -> Option<usize> {
        self.entries.first().map(BloomFilter::size)
    }
}

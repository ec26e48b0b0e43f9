//! Deployment parameters for skip index construction.

use crate::types::{SkipError, SkipResult};

/// Global parameters shared by every filter a deployment will ever merge or
/// compare.
///
/// Both values are chosen once per deployment and fixed afterwards: filters
/// of different sizes cannot be merged, and skip indexes with different entry
/// counts cover different jump distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipParams {
    /// Size of every Bloom filter, in bytes. Must be a positive multiple
    /// of 8.
    pub filter_size: usize,
    /// Number of entries in every skip index. Entry `j` covers a backward
    /// window of `2^j` blocks, so `num_entries` bounds the largest jump at
    /// `2^(num_entries - 1)`.
    pub num_entries: usize,
}

/// Default parameters: 256-byte filters and 16 skip entries, covering jumps
/// of up to 32768 blocks.
pub const DEFAULT_PARAMS: SkipParams = SkipParams { filter_size: 256, num_entries: 16 };

impl Default for SkipParams {
    fn default() -> Self {
        DEFAULT_PARAMS
    }
}

impl SkipParams {
    /// Creates a parameter set, validating the filter size.
    pub fn new(filter_size: usize, num_entries: usize) -> SkipResult<Self> {
        let params = Self { filter_size, num_entries };
        params.validate()?;
        Ok(params)
    }

    /// Validates the filter size constraint.
    pub fn validate(&self) -> SkipResult<()> {
        if self.filter_size == 0 || self.filter_size % 8 != 0 {
            return Err(SkipError::InvalidSize(self.filter_size));
        }
        Ok(())
    }
}

//! Inductive construction of per-block skip indexes.
//!
//! Entry `j` of a block at height `h` must equal the union of the own filters
//! over the window `[h - 2^j, h - 1]`. That window splits into the two
//! `2^(j-1)`-windows ending at heights `h - 2^(j-1)` and `h`, which are
//! exactly the windows summarized by entry `j-1` of the blocks at distances
//! `2^j` and `2^(j-1)`. The recurrence therefore only works when blocks are
//! indexed in strictly increasing order with no gaps: entry `j` reads entry
//! `j-1` of two already-persisted predecessors.

use crate::{
    bloom::BloomFilter,
    filter_file::FilterFileReader,
    index::BlockIndex,
    params::SkipParams,
    skip::SkipIndex,
    storage::{ChainIndexReader, ChainIndexWriter},
    types::{BlockId, SkipError, SkipResult},
};
use std::io::Read;
use tracing::{info, trace};

/// Builds the skip index for the block at `block_id` and `height` from the
/// already-persisted predecessor indices in `chain`.
///
/// `height` is the zero-based position of the block in the indexed sequence;
/// every identifier strictly below `block_id` down to the first indexed block
/// must already be present in `chain`. A missing predecessor surfaces as
/// [`SkipError::NotFound`] and indicates a broken sequential precondition.
pub fn build_skip_index<C>(
    chain: &C,
    params: &SkipParams,
    block_id: BlockId,
    height: u64,
) -> SkipResult<SkipIndex>
where
    C: ChainIndexReader + ?Sized,
{
    debug_assert!(u64::from(block_id) >= height, "identifiers are contiguous in chain order");

    let mut entries = Vec::with_capacity(params.num_entries);
    for _ in 0..params.num_entries {
        entries.push(BloomFilter::new(params.filter_size)?);
    }
    // The first block of the chain has no predecessors to summarize.
    if height == 0 || params.num_entries == 0 {
        return SkipIndex::from_entries(entries);
    }

    let predecessor = chain.get_block_index(block_id - 1)?;
    entries[0].merge(&predecessor.filter)?;

    for j in 1..params.num_entries {
        // Not enough history to fill a 2^j window; the remaining entries
        // stay all-zero.
        if j >= 63 || (1u64 << j) >= height {
            break;
        }
        let far = chain.get_block_index(block_id - (1 << j))?;
        entries[j].merge(far.skip.entry(j - 1)?)?;
        let near = chain.get_block_index(block_id - (1 << (j - 1)))?;
        entries[j].merge(near.skip.entry(j - 1)?)?;
    }
    SkipIndex::from_entries(entries)
}

/// Sequential driver that populates the chain index store, one block at a
/// time in chain order.
///
/// The indexer tracks the running height and the next expected block
/// identifier; submitting blocks out of order or with gaps fails with
/// [`SkipError::InvalidBlockSequence`] before anything is written. Existing
/// entries are never mutated, only read.
#[derive(Debug)]
pub struct ChainIndexer<S> {
    params: SkipParams,
    storage: S,
    next_block: Option<BlockId>,
    height: u64,
}

impl<S> ChainIndexer<S>
where
    S: ChainIndexReader + ChainIndexWriter,
{
    /// Creates an indexer writing through `storage`.
    pub fn new(params: SkipParams, storage: S) -> SkipResult<Self> {
        params.validate()?;
        Ok(Self { params, storage, next_block: None, height: 0 })
    }

    /// Indexes a single block given its own filter.
    ///
    /// The first submitted block fixes the starting identifier; every
    /// subsequent call must supply the next consecutive identifier. The
    /// filter must match the deployment's configured size.
    pub fn index_block(&mut self, block_id: BlockId, filter: BloomFilter) -> SkipResult<()> {
        if let Some(expected) = self.next_block {
            if block_id != expected {
                return Err(SkipError::InvalidBlockSequence { expected, actual: block_id });
            }
        }
        if filter.size() != self.params.filter_size {
            return Err(SkipError::SizeMismatch {
                expected: self.params.filter_size,
                actual: filter.size(),
            });
        }

        let skip = build_skip_index(&self.storage, &self.params, block_id, self.height)?;
        self.storage.store_block_index(block_id, BlockIndex::new(filter, skip)?)?;

        trace!(target: "skip-index::builder", block_id, height = self.height, "indexed block");
        self.height += 1;
        self.next_block = Some(block_id + 1);
        Ok(())
    }

    /// Drains a filter file into the store and returns the number of blocks
    /// indexed.
    ///
    /// The file's declared filter size must match the deployment parameters.
    pub fn index_filter_file<R: Read>(
        &mut self,
        reader: &mut FilterFileReader<R>,
    ) -> SkipResult<u64> {
        if reader.filter_size() != self.params.filter_size {
            return Err(SkipError::SizeMismatch {
                expected: self.params.filter_size,
                actual: reader.filter_size(),
            });
        }
        let mut blocks = 0u64;
        while let Some((block_id, filter)) = reader.read_filter()? {
            self.index_block(block_id, filter)?;
            blocks += 1;
        }
        info!(target: "skip-index::builder", blocks, "chain index built from filter file");
        Ok(blocks)
    }

    /// Returns the number of blocks indexed so far.
    pub const fn blocks_indexed(&self) -> u64 {
        self.height
    }

    /// Returns the parameters this indexer was configured with.
    pub const fn params(&self) -> &SkipParams {
        &self.params
    }

    /// Consumes the indexer and returns the underlying store.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

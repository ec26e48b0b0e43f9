//! Storage collaborator contracts.
//!
//! The core reads and writes two persistent key-value stores, both keyed by
//! block identifier: the chain index (one [`BlockIndex`] per block) and the
//! chain storage (the exact set of events per block). Any backing store with
//! point lookups and point writes satisfies these contracts; the core
//! performs no locking itself and assumes concurrent-read / serialized-write
//! guarantees from the implementation.

use crate::{
    event::EventSet,
    index::BlockIndex,
    types::{BlockId, SkipResult},
};

/// Read access to the per-block index store.
pub trait ChainIndexReader: Send + Sync {
    /// Returns the [`BlockIndex`] associated with a block.
    ///
    /// Fails with [`crate::SkipError::NotFound`] if the block has not been
    /// indexed. During construction this is a fatal precondition violation;
    /// queries near range boundaries must handle it explicitly.
    fn get_block_index(&self, block_id: BlockId) -> SkipResult<BlockIndex>;
}

/// Write access to the per-block index store.
pub trait ChainIndexWriter: Send + Sync {
    /// Associates a freshly built [`BlockIndex`] with a block.
    ///
    /// Block indices are written once, in increasing block order, and never
    /// revised.
    fn store_block_index(&self, block_id: BlockId, index: BlockIndex) -> SkipResult<()>;
}

/// Read access to the per-block exact event sets.
pub trait ChainStorageReader: Send + Sync {
    /// Returns the exact set of events included in a block.
    ///
    /// Fails with [`crate::SkipError::NotFound`] if the block is absent or
    /// [`crate::SkipError::MalformedData`] if its stored form is corrupt.
    fn get_block_events(&self, block_id: BlockId) -> SkipResult<EventSet>;
}

/// Write access to the per-block exact event sets.
pub trait ChainStorageWriter: Send + Sync {
    /// Associates the set of events with a block.
    fn store_block_events(&self, block_id: BlockId, events: EventSet) -> SkipResult<()>;
}

impl<T: ChainIndexReader + ?Sized> ChainIndexReader for &T {
    fn get_block_index(&self, block_id: BlockId) -> SkipResult<BlockIndex> {
        (**self).get_block_index(block_id)
    }
}

impl<T: ChainIndexWriter + ?Sized> ChainIndexWriter for &T {
    fn store_block_index(&self, block_id: BlockId, index: BlockIndex) -> SkipResult<()> {
        (**self).store_block_index(block_id, index)
    }
}

impl<T: ChainStorageReader + ?Sized> ChainStorageReader for &T {
    fn get_block_events(&self, block_id: BlockId) -> SkipResult<EventSet> {
        (**self).get_block_events(block_id)
    }
}

impl<T: ChainStorageWriter + ?Sized> ChainStorageWriter for &T {
    fn store_block_events(&self, block_id: BlockId, events: EventSet) -> SkipResult<()> {
        (**self).store_block_events(block_id, events)
    }
}
